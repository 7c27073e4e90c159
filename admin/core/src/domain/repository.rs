// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts for each aggregate, defined in the domain layer and
//! implemented in `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `DomainRepository` | `Domain` | `InMemoryDomainRepository`, `PostgresDomainRepository` |
//! | `PatternRepository` | `Pattern` | `InMemoryPatternRepository`, `PostgresPatternRepository` |
//! | `DnsRecordRepository` | `DnsRecord` | `InMemoryDnsRecordRepository`, `PostgresDnsRecordRepository` |
//! | `InteractionRepository` | captured traffic (read-only) | `InMemoryInteractionRepository`, `PostgresInteractionRepository` |
//!
//! Every pattern/record operation takes the owning `Host`: a lookup by id
//! alone does not exist, so one tenant cannot reach another's resources.

use async_trait::async_trait;

use crate::domain::dns_record::DnsRecord;
use crate::domain::interaction::{
    After, DnsInteraction, HttpInteraction, HttpQuery, InteractionCounts, SmtpInteraction,
};
use crate::domain::pattern::Pattern;
use crate::domain::payload::ResourceId;
use crate::domain::tenant::{AccessKey, Domain, Host};

/// Storage backend enum for pluggable persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub connection_string: String,
    pub max_connections: u32,
}

/// Registry of tenant domains and their keys
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Insert a new domain; `RepositoryError::Conflict` if the host exists
    async fn insert(&self, domain: &Domain) -> Result<(), RepositoryError>;

    async fn find_by_host(&self, host: &Host) -> Result<Option<Domain>, RepositoryError>;

    /// Exact-match key lookup
    async fn find_by_access_key(&self, key: &AccessKey) -> Result<Option<Domain>, RepositoryError>;
}

/// Response patterns, always scoped by host
#[async_trait]
pub trait PatternRepository: Send + Sync {
    async fn insert(&self, pattern: &Pattern) -> Result<(), RepositoryError>;

    async fn list_by_host(&self, host: &Host) -> Result<Vec<Pattern>, RepositoryError>;

    async fn find(&self, host: &Host, id: &ResourceId) -> Result<Option<Pattern>, RepositoryError>;

    /// Overwrite every mutable field of `(pattern.id, pattern.host)`.
    /// Returns false if no such pattern exists.
    async fn replace(&self, pattern: &Pattern) -> Result<bool, RepositoryError>;

    /// Returns false if nothing matched
    async fn delete(&self, host: &Host, id: &ResourceId) -> Result<bool, RepositoryError>;
}

/// DNS records, always scoped by host
#[async_trait]
pub trait DnsRecordRepository: Send + Sync {
    async fn insert(&self, record: &DnsRecord) -> Result<(), RepositoryError>;

    async fn list_by_host(&self, host: &Host) -> Result<Vec<DnsRecord>, RepositoryError>;

    async fn find(&self, host: &Host, id: &ResourceId) -> Result<Option<DnsRecord>, RepositoryError>;

    /// Overwrite the full shape of `(record.id, record.host)`, clearing the
    /// columns of the variant it no longer has. False if no such record.
    async fn replace(&self, record: &DnsRecord) -> Result<bool, RepositoryError>;

    async fn delete(&self, host: &Host, id: &ResourceId) -> Result<bool, RepositoryError>;
}

/// Read side of the capture pipeline's append-only streams
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn find_http(&self, host: &Host, query: &HttpQuery) -> Result<Vec<HttpInteraction>, RepositoryError>;

    async fn find_dns(&self, host: &Host, after: After) -> Result<Vec<DnsInteraction>, RepositoryError>;

    async fn find_smtp(&self, host: &Host, after: After) -> Result<Vec<SmtpInteraction>, RepositoryError>;

    async fn count(&self, host: &Host) -> Result<InteractionCounts, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Conflict(db.message().to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
