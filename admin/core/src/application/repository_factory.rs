// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates concrete repository implementations based on storage backend
//! configuration and wires them into the application services. The domain
//! layer only defines the traits; this is the one place that knows which
//! implementation backs them.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Select repositories and assemble [`AdminServices`]

use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::application::access_gate::AccessGate;
use crate::application::dns_record_service::{DnsRecordService, StandardDnsRecordService};
use crate::application::domain_registry::{DomainRegistry, StandardDomainRegistry};
use crate::application::interaction_service::{InteractionService, StandardInteractionService};
use crate::application::pattern_service::{PatternService, StandardPatternService};
use crate::domain::repository::{
    DnsRecordRepository, DomainRepository, InteractionRepository, PatternRepository,
    StorageBackend,
};
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::postgres_dns_record::PostgresDnsRecordRepository;
use crate::infrastructure::repositories::postgres_domain::PostgresDomainRepository;
use crate::infrastructure::repositories::postgres_interaction::PostgresInteractionRepository;
use crate::infrastructure::repositories::postgres_pattern::PostgresPatternRepository;
use crate::infrastructure::repositories::{
    InMemoryDnsRecordRepository, InMemoryDomainRepository, InMemoryInteractionRepository,
    InMemoryPatternRepository,
};

/// One repository per aggregate, all on the same backend.
#[derive(Clone)]
pub struct Repositories {
    pub domains: Arc<dyn DomainRepository>,
    pub patterns: Arc<dyn PatternRepository>,
    pub dns_records: Arc<dyn DnsRecordRepository>,
    pub interactions: Arc<dyn InteractionRepository>,
}

impl Repositories {
    /// Process-local repositories. The interaction store is passed in so
    /// callers can keep a handle for seeding captured traffic.
    pub fn in_memory(interactions: InMemoryInteractionRepository) -> Self {
        Self {
            domains: Arc::new(InMemoryDomainRepository::new()),
            patterns: Arc::new(InMemoryPatternRepository::new()),
            dns_records: Arc::new(InMemoryDnsRecordRepository::new()),
            interactions: Arc::new(interactions),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            domains: Arc::new(PostgresDomainRepository::new(pool.clone())),
            patterns: Arc::new(PostgresPatternRepository::new(pool.clone())),
            dns_records: Arc::new(PostgresDnsRecordRepository::new(pool.clone())),
            interactions: Arc::new(PostgresInteractionRepository::new(pool)),
        }
    }

    /// Connect (and migrate) if the backend needs it, then build repositories
    pub async fn from_backend(backend: &StorageBackend) -> Result<Self> {
        match backend {
            StorageBackend::InMemory => {
                info!("Using in-memory storage; all data is lost on restart");
                Ok(Self::in_memory(InMemoryInteractionRepository::new()))
            }
            StorageBackend::PostgreSQL(config) => {
                let database = Database::new(config).await?;
                database.migrate().await?;
                info!("Connected to PostgreSQL and applied migrations");
                Ok(Self::postgres(database.get_pool().clone()))
            }
        }
    }
}

/// Everything the presentation layer needs to serve requests.
#[derive(Clone)]
pub struct AdminServices {
    pub gate: AccessGate,
    pub registry: Arc<dyn DomainRegistry>,
    pub patterns: Arc<dyn PatternService>,
    pub dns_records: Arc<dyn DnsRecordService>,
    pub interactions: Arc<dyn InteractionService>,
}

impl AdminServices {
    pub fn new(base_domain: impl Into<String>, repositories: Repositories) -> Self {
        Self {
            gate: AccessGate::new(repositories.domains.clone()),
            registry: Arc::new(StandardDomainRegistry::new(
                base_domain,
                repositories.domains,
                repositories.interactions.clone(),
            )),
            patterns: Arc::new(StandardPatternService::new(repositories.patterns)),
            dns_records: Arc::new(StandardDnsRecordService::new(repositories.dns_records)),
            interactions: Arc::new(StandardInteractionService::new(repositories.interactions)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_backend_wires_shared_domain_store() {
        let repositories = Repositories::from_backend(&StorageBackend::InMemory).await.unwrap();
        let services = AdminServices::new("collab.test", repositories);

        let registration = services.registry.register(Some("wired")).await.unwrap();
        let tenant = services
            .gate
            .authorize(Some(registration.access_key.as_str()))
            .await
            .unwrap();
        assert_eq!(tenant.host().as_str(), "wired.collab.test");
        assert!(services.patterns.list(&tenant).await.unwrap().is_empty());
    }
}
