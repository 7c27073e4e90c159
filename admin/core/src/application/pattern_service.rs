// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Pattern Application Service
//!
//! Create/list/update/delete of response patterns for an authorized tenant.
//! Updates are full replacements of the mutable field set: a field the
//! caller leaves out is cleared, not kept.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::access_gate::Tenant;
use crate::domain::error::AdminError;
use crate::domain::pattern::{Pattern, PatternFields};
use crate::domain::payload::{ResourceId, UpdateEnvelope, UpdateOutcome};
use crate::domain::repository::PatternRepository;

#[async_trait]
pub trait PatternService: Send + Sync {
    /// Create a pattern with default fields
    async fn create(&self, tenant: &Tenant) -> Result<Pattern, AdminError>;

    async fn list(&self, tenant: &Tenant) -> Result<Vec<Pattern>, AdminError>;

    /// Replace the field set of one of the tenant's patterns
    async fn update(&self, tenant: &Tenant, envelope: UpdateEnvelope) -> Result<UpdateOutcome, AdminError>;

    /// Returns false if the tenant has no pattern with this id
    async fn delete(&self, tenant: &Tenant, id: &ResourceId) -> Result<bool, AdminError>;
}

pub struct StandardPatternService {
    repository: Arc<dyn PatternRepository>,
}

impl StandardPatternService {
    pub fn new(repository: Arc<dyn PatternRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl PatternService for StandardPatternService {
    async fn create(&self, tenant: &Tenant) -> Result<Pattern, AdminError> {
        let pattern = Pattern::new(tenant.host().clone());
        self.repository.insert(&pattern).await?;
        info!(host = %pattern.host, id = %pattern.id, "Created pattern");
        Ok(pattern)
    }

    async fn list(&self, tenant: &Tenant) -> Result<Vec<Pattern>, AdminError> {
        let patterns = self.repository.list_by_host(tenant.host()).await?;
        debug!(host = %tenant.host(), count = patterns.len(), "Listed patterns");
        Ok(patterns)
    }

    async fn update(&self, tenant: &Tenant, envelope: UpdateEnvelope) -> Result<UpdateOutcome, AdminError> {
        let fields = PatternFields::from_update(envelope.fields)?;

        let Some(existing) = self.repository.find(tenant.host(), &envelope.id).await? else {
            debug!(host = %tenant.host(), id = %envelope.id, "Pattern update matched nothing");
            return Ok(UpdateOutcome::NotFound);
        };

        let updated = existing.with_fields(fields);
        if updated == existing {
            return Ok(UpdateOutcome::Unchanged);
        }

        // Deleted between find and replace
        if !self.repository.replace(&updated).await? {
            return Ok(UpdateOutcome::NotFound);
        }

        info!(host = %updated.host, id = %updated.id, "Updated pattern");
        Ok(UpdateOutcome::Updated)
    }

    async fn delete(&self, tenant: &Tenant, id: &ResourceId) -> Result<bool, AdminError> {
        let deleted = self.repository.delete(tenant.host(), id).await?;
        if deleted {
            info!(host = %tenant.host(), id = %id, "Deleted pattern");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::access_gate::AccessGate;
    use crate::domain::pattern::ResponseHeader;
    use crate::domain::repository::DomainRepository;
    use crate::domain::tenant::{Domain, HostLabel};
    use crate::infrastructure::repositories::{InMemoryDomainRepository, InMemoryPatternRepository};
    use serde_json::{json, Value};

    async fn tenants(names: &[&str]) -> Vec<Tenant> {
        let domains = Arc::new(InMemoryDomainRepository::new());
        let gate = AccessGate::new(domains.clone());
        let mut tenants = Vec::new();
        for name in names {
            let domain = Domain::register(&HostLabel::parse(name).unwrap(), "collab.test");
            domains.insert(&domain).await.unwrap();
            tenants.push(gate.authorize(Some(domain.access_key.as_str())).await.unwrap());
        }
        tenants
    }

    fn envelope(payload: Value) -> UpdateEnvelope {
        UpdateEnvelope::from_payload(Some(payload)).unwrap()
    }

    #[tokio::test]
    async fn test_update_clears_omitted_fields() {
        let tenants = tenants(&["a"]).await;
        let service = StandardPatternService::new(Arc::new(InMemoryPatternRepository::new()));
        let pattern = service.create(&tenants[0]).await.unwrap();

        let outcome = service
            .update(&tenants[0], envelope(json!({"id": pattern.id.as_str(), "pattern": "^/x"})))
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);

        let stored = service.list(&tenants[0]).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            stored[0].fields,
            PatternFields {
                pattern: Some("^/x".to_string()),
                ..PatternFields::default()
            }
        );
    }

    #[tokio::test]
    async fn test_identical_update_is_unchanged() {
        let tenants = tenants(&["a"]).await;
        let service = StandardPatternService::new(Arc::new(InMemoryPatternRepository::new()));
        let pattern = service.create(&tenants[0]).await.unwrap();

        let outcome = service
            .update(
                &tenants[0],
                envelope(json!({
                    "id": pattern.id.as_str(),
                    "pattern": ".*",
                    "priority": 0,
                    "responsebody": "",
                    "responsecode": 200,
                    "responseheaders": [{"key": "Content-Type", "value": "text/html"}]
                })),
            )
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert!(outcome.matched());
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_invalid_fields_do_not_write() {
        let tenants = tenants(&["a"]).await;
        let service = StandardPatternService::new(Arc::new(InMemoryPatternRepository::new()));
        let pattern = service.create(&tenants[0]).await.unwrap();

        let result = service
            .update(&tenants[0], envelope(json!({"id": pattern.id.as_str(), "bogus": 1})))
            .await;
        assert!(matches!(result, Err(AdminError::InvalidRequest(_))));

        let stored = service.list(&tenants[0]).await.unwrap();
        assert_eq!(stored[0], pattern);
    }

    #[tokio::test]
    async fn test_cross_tenant_isolation() {
        let tenants = tenants(&["a", "b"]).await;
        let (a, b) = (&tenants[0], &tenants[1]);
        let service = StandardPatternService::new(Arc::new(InMemoryPatternRepository::new()));
        let pattern = service.create(a).await.unwrap();

        assert!(service.list(b).await.unwrap().is_empty());

        let outcome = service
            .update(b, envelope(json!({"id": pattern.id.as_str(), "pattern": "stolen"})))
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
        assert!(!service.delete(b, &pattern.id).await.unwrap());

        let stored = service.list(a).await.unwrap();
        assert_eq!(stored, vec![pattern.clone()]);
        assert_eq!(
            stored[0].fields.response_headers,
            Some(vec![ResponseHeader::new("Content-Type", "text/html")])
        );

        assert!(service.delete(a, &pattern.id).await.unwrap());
        assert!(!service.delete(a, &pattern.id).await.unwrap());
    }
}
