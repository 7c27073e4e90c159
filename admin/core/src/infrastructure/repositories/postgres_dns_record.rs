// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL DNS Record Repository
//!
//! `DnsRecordRepository` backed by the `dns_records` table. The answer
//! variant is flattened into `response_type` plus one column per variant
//! field; the columns of the other variant are always written as `NULL`.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::dns_record::{
    DnsAnswer, DnsRecord, DnsRecordShape, RebindAnswer, ResponseType, StaticAnswer, Ttl,
};
use crate::domain::payload::ResourceId;
use crate::domain::repository::{DnsRecordRepository, RepositoryError};
use crate::domain::tenant::Host;

pub struct PostgresDnsRecordRepository {
    pool: PgPool,
}

impl PostgresDnsRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_RECORD: &str = r#"
    SELECT id, host, response_type, name, record_type, value, ttl, value1, value2
    FROM dns_records
"#;

/// Column values for the variant-specific part of a record.
struct AnswerColumns<'a> {
    value: Option<&'a str>,
    ttl: Option<&'a str>,
    value1: Option<&'a str>,
    value2: Option<&'a str>,
}

impl<'a> AnswerColumns<'a> {
    fn of(answer: &'a DnsAnswer) -> Self {
        match answer {
            DnsAnswer::Static(StaticAnswer { value, ttl }) => Self {
                value: value.as_deref(),
                ttl: ttl.as_ref().map(Ttl::as_str),
                value1: None,
                value2: None,
            },
            DnsAnswer::Rebind(RebindAnswer { value1, value2 }) => Self {
                value: None,
                ttl: None,
                value1: value1.as_deref(),
                value2: value2.as_deref(),
            },
        }
    }
}

#[async_trait]
impl DnsRecordRepository for PostgresDnsRecordRepository {
    async fn insert(&self, record: &DnsRecord) -> Result<(), RepositoryError> {
        let answer = AnswerColumns::of(&record.shape.answer);
        sqlx::query(
            r#"
            INSERT INTO dns_records (
                id, host, response_type, name, record_type, value, ttl, value1, value2
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.host.as_str())
        .bind(record.response_type().as_str())
        .bind(record.shape.name.as_deref())
        .bind(record.shape.record_type.as_deref())
        .bind(answer.value)
        .bind(answer.ttl)
        .bind(answer.value1)
        .bind(answer.value2)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_by_host(&self, host: &Host) -> Result<Vec<DnsRecord>, RepositoryError> {
        let rows = sqlx::query(&format!("{} WHERE host = $1 ORDER BY row_id", SELECT_RECORD))
            .bind(host.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(parse_record_row).collect()
    }

    async fn find(&self, host: &Host, id: &ResourceId) -> Result<Option<DnsRecord>, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE host = $1 AND id = $2", SELECT_RECORD))
            .bind(host.as_str())
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(parse_record_row).transpose()
    }

    async fn replace(&self, record: &DnsRecord) -> Result<bool, RepositoryError> {
        let answer = AnswerColumns::of(&record.shape.answer);
        let result = sqlx::query(
            r#"
            UPDATE dns_records SET
                response_type = $3,
                name = $4,
                record_type = $5,
                value = $6,
                ttl = $7,
                value1 = $8,
                value2 = $9
            WHERE host = $1 AND id = $2
            "#,
        )
        .bind(record.host.as_str())
        .bind(record.id.as_str())
        .bind(record.response_type().as_str())
        .bind(record.shape.name.as_deref())
        .bind(record.shape.record_type.as_deref())
        .bind(answer.value)
        .bind(answer.ttl)
        .bind(answer.value1)
        .bind(answer.value2)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, host: &Host, id: &ResourceId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM dns_records
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

/// Parse a DNS record from a database row
fn parse_record_row(row: PgRow) -> Result<DnsRecord, RepositoryError> {
    let id: String = row.try_get("id")?;
    let host: String = row.try_get("host")?;
    let response_type: String = row.try_get("response_type")?;

    let response_type = ResponseType::parse(&response_type).map_err(|_| {
        RepositoryError::Serialization(format!("Unknown response_type '{}'", response_type))
    })?;

    let answer = match response_type {
        ResponseType::Static => DnsAnswer::Static(StaticAnswer {
            value: row.try_get("value")?,
            ttl: row.try_get::<Option<String>, _>("ttl")?.map(Ttl::new),
        }),
        ResponseType::Rebind => DnsAnswer::Rebind(RebindAnswer {
            value1: row.try_get("value1")?,
            value2: row.try_get("value2")?,
        }),
    };

    Ok(DnsRecord {
        host: Host::new(host),
        id: ResourceId::new(id),
        shape: DnsRecordShape {
            name: row.try_get("name")?,
            record_type: row.try_get("record_type")?,
            answer,
        },
    })
}
