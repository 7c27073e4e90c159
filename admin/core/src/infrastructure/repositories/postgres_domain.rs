// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Domain Repository
//!
//! `DomainRepository` backed by the `domains` table. `host` is the primary
//! key, so concurrent registrations of the same host surface as
//! `RepositoryError::Conflict` from the unique violation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::repository::{DomainRepository, RepositoryError};
use crate::domain::tenant::{AccessKey, Domain, Host};

pub struct PostgresDomainRepository {
    pool: PgPool,
}

impl PostgresDomainRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DomainRepository for PostgresDomainRepository {
    async fn insert(&self, domain: &Domain) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO domains (host, access_key, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(domain.host.as_str())
        .bind(domain.access_key.as_str())
        .bind(domain.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_host(&self, host: &Host) -> Result<Option<Domain>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT host, access_key, created_at
            FROM domains
            WHERE host = $1
            "#,
        )
        .bind(host.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(parse_domain_row).transpose()
    }

    async fn find_by_access_key(&self, key: &AccessKey) -> Result<Option<Domain>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT host, access_key, created_at
            FROM domains
            WHERE access_key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(parse_domain_row).transpose()
    }
}

fn parse_domain_row(row: PgRow) -> Result<Domain, RepositoryError> {
    let host: String = row.try_get("host")?;
    let access_key: String = row.try_get("access_key")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Domain {
        host: Host::new(host),
        access_key: AccessKey::new(access_key),
        created_at,
    })
}
