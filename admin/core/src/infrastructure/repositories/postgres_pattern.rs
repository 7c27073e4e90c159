// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Pattern Repository
//!
//! `PatternRepository` backed by the `patterns` table. Every mutable field
//! is a nullable column; `replace` writes all of them so omitted fields end
//! up `NULL`. Headers and the external handler are stored as JSONB.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::types::Json;
use sqlx::Row;

use crate::domain::pattern::{ExternalHandler, Pattern, PatternFields, ResponseHeader};
use crate::domain::payload::ResourceId;
use crate::domain::repository::{PatternRepository, RepositoryError};
use crate::domain::tenant::Host;

pub struct PostgresPatternRepository {
    pool: PgPool,
}

impl PostgresPatternRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_PATTERN: &str = r#"
    SELECT id, host, pattern, priority, response_body, response_code,
           response_headers, external_handler
    FROM patterns
"#;

#[async_trait]
impl PatternRepository for PostgresPatternRepository {
    async fn insert(&self, pattern: &Pattern) -> Result<(), RepositoryError> {
        let fields = &pattern.fields;
        sqlx::query(
            r#"
            INSERT INTO patterns (
                id, host, pattern, priority, response_body, response_code,
                response_headers, external_handler
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(pattern.id.as_str())
        .bind(pattern.host.as_str())
        .bind(fields.pattern.as_deref())
        .bind(fields.priority)
        .bind(fields.response_body.as_deref())
        .bind(fields.response_code.map(i32::from))
        .bind(fields.response_headers.as_ref().map(Json))
        .bind(fields.external_handler.as_ref().map(Json))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_by_host(&self, host: &Host) -> Result<Vec<Pattern>, RepositoryError> {
        let rows = sqlx::query(&format!("{} WHERE host = $1 ORDER BY row_id", SELECT_PATTERN))
            .bind(host.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(parse_pattern_row).collect()
    }

    async fn find(&self, host: &Host, id: &ResourceId) -> Result<Option<Pattern>, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE host = $1 AND id = $2", SELECT_PATTERN))
            .bind(host.as_str())
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(parse_pattern_row).transpose()
    }

    async fn replace(&self, pattern: &Pattern) -> Result<bool, RepositoryError> {
        let fields = &pattern.fields;
        let result = sqlx::query(
            r#"
            UPDATE patterns SET
                pattern = $3,
                priority = $4,
                response_body = $5,
                response_code = $6,
                response_headers = $7,
                external_handler = $8
            WHERE host = $1 AND id = $2
            "#,
        )
        .bind(pattern.host.as_str())
        .bind(pattern.id.as_str())
        .bind(fields.pattern.as_deref())
        .bind(fields.priority)
        .bind(fields.response_body.as_deref())
        .bind(fields.response_code.map(i32::from))
        .bind(fields.response_headers.as_ref().map(Json))
        .bind(fields.external_handler.as_ref().map(Json))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, host: &Host, id: &ResourceId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM patterns
            WHERE host = $1 AND id = $2
            "#,
        )
        .bind(host.as_str())
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Parse a pattern from a database row
fn parse_pattern_row(row: PgRow) -> Result<Pattern, RepositoryError> {
    let id: String = row.try_get("id")?;
    let host: String = row.try_get("host")?;
    let response_code: Option<i32> = row.try_get("response_code")?;
    let response_headers: Option<Json<Vec<ResponseHeader>>> = row.try_get("response_headers")?;
    let external_handler: Option<Json<ExternalHandler>> = row.try_get("external_handler")?;

    let response_code = response_code
        .map(u16::try_from)
        .transpose()
        .map_err(|e| RepositoryError::Serialization(format!("Invalid response_code: {}", e)))?;

    Ok(Pattern {
        host: Host::new(host),
        id: ResourceId::new(id),
        fields: PatternFields {
            pattern: row.try_get("pattern")?,
            priority: row.try_get("priority")?,
            response_body: row.try_get("response_body")?,
            response_code,
            response_headers: response_headers.map(|Json(headers)| headers),
            external_handler: external_handler.map(|Json(handler)| handler),
        },
    })
}
