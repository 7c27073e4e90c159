// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Interaction Repository
//!
//! Read-only view over `http_requests`, `dns_requests` and `smtp_requests`,
//! which the capture pipeline appends to. `after` is an exclusive bound on
//! `timestamp`; a `NULL` bound disables it.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::interaction::{
    After, DnsInteraction, HttpInteraction, HttpQuery, InteractionCounts, SmtpInteraction,
};
use crate::domain::repository::{InteractionRepository, RepositoryError};
use crate::domain::tenant::Host;

pub struct PostgresInteractionRepository {
    pool: PgPool,
}

impl PostgresInteractionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionRepository for PostgresInteractionRepository {
    async fn find_http(&self, host: &Host, query: &HttpQuery) -> Result<Vec<HttpInteraction>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT host, timestamp, pattern_id, remote_addr, raw_request
            FROM http_requests
            WHERE host = $1
              AND ($2::timestamptz IS NULL OR timestamp > $2)
              AND ($3::text IS NULL OR pattern_id = $3)
            ORDER BY timestamp ASC
            "#,
        )
        .bind(host.as_str())
        .bind(query.after.instant())
        .bind(query.pattern_id.as_deref())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(HttpInteraction {
                    host: parse_host(&row)?,
                    timestamp: row.try_get("timestamp")?,
                    pattern_id: row.try_get("pattern_id")?,
                    remote_addr: row.try_get("remote_addr")?,
                    raw_request: row.try_get("raw_request")?,
                })
            })
            .collect()
    }

    async fn find_dns(&self, host: &Host, after: After) -> Result<Vec<DnsInteraction>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT host, timestamp, remote_addr, query_name, query_type
            FROM dns_requests
            WHERE host = $1
              AND ($2::timestamptz IS NULL OR timestamp > $2)
            ORDER BY timestamp ASC
            "#,
        )
        .bind(host.as_str())
        .bind(after.instant())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(DnsInteraction {
                    host: parse_host(&row)?,
                    timestamp: row.try_get("timestamp")?,
                    remote_addr: row.try_get("remote_addr")?,
                    name: row.try_get("query_name")?,
                    query_type: row.try_get("query_type")?,
                })
            })
            .collect()
    }

    async fn find_smtp(&self, host: &Host, after: After) -> Result<Vec<SmtpInteraction>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT host, timestamp, remote_addr, data
            FROM smtp_requests
            WHERE host = $1
              AND ($2::timestamptz IS NULL OR timestamp > $2)
            ORDER BY timestamp ASC
            "#,
        )
        .bind(host.as_str())
        .bind(after.instant())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(SmtpInteraction {
                    host: parse_host(&row)?,
                    timestamp: row.try_get("timestamp")?,
                    remote_addr: row.try_get("remote_addr")?,
                    data: row.try_get("data")?,
                })
            })
            .collect()
    }

    async fn count(&self, host: &Host) -> Result<InteractionCounts, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM http_requests WHERE host = $1) AS http,
                (SELECT COUNT(*) FROM dns_requests WHERE host = $1) AS dns,
                (SELECT COUNT(*) FROM smtp_requests WHERE host = $1) AS smtp
            "#,
        )
        .bind(host.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(InteractionCounts {
            http: non_negative(row.try_get("http")?),
            dns: non_negative(row.try_get("dns")?),
            smtp: non_negative(row.try_get("smtp")?),
        })
    }
}

fn parse_host(row: &PgRow) -> Result<Host, RepositoryError> {
    let host: String = row.try_get("host")?;
    Ok(Host::new(host))
}

fn non_negative(count: i64) -> u64 {
    count.max(0) as u64
}

