// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Domain Registry Application Service
//!
//! Registers tenant subdomains under the configured base domain and mints
//! their access keys. Registration is the only operation that does not go
//! through the [`AccessGate`](crate::application::AccessGate).

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::access_gate::Tenant;
use crate::domain::error::AdminError;
use crate::domain::interaction::InteractionCounts;
use crate::domain::repository::{DomainRepository, InteractionRepository, RepositoryError};
use crate::domain::tenant::{AccessKey, Domain, Host, HostLabel};

/// What a caller learns from a successful registration. The access key is
/// never shown again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub host: Host,
    pub access_key: AccessKey,
}

#[async_trait]
pub trait DomainRegistry: Send + Sync {
    /// Register `requested` (or a generated label) under the base domain
    async fn register(&self, requested: Option<&str>) -> Result<Registration, AdminError>;

    /// Per-stream interaction totals for the tenant's host
    async fn describe(&self, tenant: &Tenant) -> Result<InteractionCounts, AdminError>;
}

pub struct StandardDomainRegistry {
    base_domain: String,
    domains: Arc<dyn DomainRepository>,
    interactions: Arc<dyn InteractionRepository>,
}

impl StandardDomainRegistry {
    pub fn new(
        base_domain: impl Into<String>,
        domains: Arc<dyn DomainRepository>,
        interactions: Arc<dyn InteractionRepository>,
    ) -> Self {
        Self {
            base_domain: base_domain.into(),
            domains,
            interactions,
        }
    }
}

#[async_trait]
impl DomainRegistry for StandardDomainRegistry {
    async fn register(&self, requested: Option<&str>) -> Result<Registration, AdminError> {
        let label = HostLabel::from_request(requested)?;
        let domain = Domain::register(&label, &self.base_domain);

        if self.domains.find_by_host(&domain.host).await?.is_some() {
            warn!(host = %domain.host, "Registration refused: host already taken");
            return Err(AdminError::DuplicateDomain);
        }

        // A concurrent registration can still win between lookup and insert
        match self.domains.insert(&domain).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                warn!(host = %domain.host, "Registration lost race for host");
                return Err(AdminError::DuplicateDomain);
            }
            Err(e) => return Err(e.into()),
        }

        info!(host = %domain.host, "Registered domain");
        Ok(Registration {
            host: domain.host,
            access_key: domain.access_key,
        })
    }

    async fn describe(&self, tenant: &Tenant) -> Result<InteractionCounts, AdminError> {
        let counts = self.interactions.count(tenant.host()).await?;
        debug!(host = %tenant.host(), ?counts, "Described domain");
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::access_gate::AccessGate;
    use crate::domain::interaction::SmtpInteraction;
    use crate::infrastructure::repositories::{InMemoryDomainRepository, InMemoryInteractionRepository};
    use chrono::Utc;

    fn registry() -> (StandardDomainRegistry, AccessGate, InMemoryInteractionRepository) {
        let domains = Arc::new(InMemoryDomainRepository::new());
        let interactions = InMemoryInteractionRepository::new();
        let registry = StandardDomainRegistry::new(
            "collab.test",
            domains.clone(),
            Arc::new(interactions.clone()),
        );
        (registry, AccessGate::new(domains), interactions)
    }

    #[tokio::test]
    async fn test_register_named_domain_once() {
        let (registry, gate, _) = registry();

        let registration = registry.register(Some("Probe")).await.unwrap();
        assert_eq!(registration.host.as_str(), "probe.collab.test");

        let tenant = gate.authorize(Some(registration.access_key.as_str())).await.unwrap();
        assert_eq!(tenant.host(), &registration.host);

        // Same composed host, different spelling
        assert!(matches!(
            registry.register(Some("PROBE")).await,
            Err(AdminError::DuplicateDomain)
        ));
    }

    #[tokio::test]
    async fn test_register_generates_label_when_absent() {
        let (registry, _, _) = registry();
        let a = registry.register(None).await.unwrap();
        let b = registry.register(Some("")).await.unwrap();

        assert_ne!(a.host, b.host);
        assert_ne!(a.access_key, b.access_key);
        assert!(a.host.as_str().ends_with(".collab.test"));
        assert_eq!(a.host.as_str().len(), 16 + ".collab.test".len());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_labels() {
        let (registry, _, _) = registry();
        for name in ["www", "_acme", "a.b", "sp ace"] {
            assert!(matches!(
                registry.register(Some(name)).await,
                Err(AdminError::InvalidHost(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_describe_counts_only_own_host() {
        let (registry, gate, interactions) = registry();
        let mine = registry.register(Some("mine")).await.unwrap();
        let theirs = registry.register(Some("theirs")).await.unwrap();

        for host in [&mine.host, &mine.host, &theirs.host] {
            interactions
                .record_smtp(SmtpInteraction {
                    host: host.clone(),
                    timestamp: Utc::now(),
                    remote_addr: None,
                    data: b"HELO".to_vec(),
                })
                .await;
        }

        let tenant = gate.authorize(Some(mine.access_key.as_str())).await.unwrap();
        let counts = registry.describe(&tenant).await.unwrap();
        assert_eq!(counts, InteractionCounts { http: 0, dns: 0, smtp: 2 });
    }
}
