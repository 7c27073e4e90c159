// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! DNS Record Application Service
//!
//! Same lifecycle as patterns, except that an update first selects the
//! record variant from `responsetype` and replaces the whole shape with it.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::access_gate::Tenant;
use crate::domain::dns_record::{DnsRecord, DnsRecordShape};
use crate::domain::error::AdminError;
use crate::domain::payload::{ResourceId, UpdateEnvelope, UpdateOutcome};
use crate::domain::repository::DnsRecordRepository;

#[async_trait]
pub trait DnsRecordService: Send + Sync {
    /// Create a static `TXT` record at `@`
    async fn create(&self, tenant: &Tenant) -> Result<DnsRecord, AdminError>;

    async fn list(&self, tenant: &Tenant) -> Result<Vec<DnsRecord>, AdminError>;

    async fn update(&self, tenant: &Tenant, envelope: UpdateEnvelope) -> Result<UpdateOutcome, AdminError>;

    async fn delete(&self, tenant: &Tenant, id: &ResourceId) -> Result<bool, AdminError>;
}

pub struct StandardDnsRecordService {
    repository: Arc<dyn DnsRecordRepository>,
}

impl StandardDnsRecordService {
    pub fn new(repository: Arc<dyn DnsRecordRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl DnsRecordService for StandardDnsRecordService {
    async fn create(&self, tenant: &Tenant) -> Result<DnsRecord, AdminError> {
        let record = DnsRecord::new(tenant.host().clone());
        self.repository.insert(&record).await?;
        info!(host = %record.host, id = %record.id, "Created DNS record");
        Ok(record)
    }

    async fn list(&self, tenant: &Tenant) -> Result<Vec<DnsRecord>, AdminError> {
        let records = self.repository.list_by_host(tenant.host()).await?;
        debug!(host = %tenant.host(), count = records.len(), "Listed DNS records");
        Ok(records)
    }

    async fn update(&self, tenant: &Tenant, envelope: UpdateEnvelope) -> Result<UpdateOutcome, AdminError> {
        let shape = DnsRecordShape::from_update(envelope.fields)?;

        let Some(existing) = self.repository.find(tenant.host(), &envelope.id).await? else {
            debug!(host = %tenant.host(), id = %envelope.id, "DNS record update matched nothing");
            return Ok(UpdateOutcome::NotFound);
        };

        let updated = existing.with_shape(shape);
        if updated == existing {
            return Ok(UpdateOutcome::Unchanged);
        }

        if !self.repository.replace(&updated).await? {
            return Ok(UpdateOutcome::NotFound);
        }

        info!(
            host = %updated.host,
            id = %updated.id,
            response_type = updated.response_type().as_str(),
            "Updated DNS record"
        );
        Ok(UpdateOutcome::Updated)
    }

    async fn delete(&self, tenant: &Tenant, id: &ResourceId) -> Result<bool, AdminError> {
        let deleted = self.repository.delete(tenant.host(), id).await?;
        if deleted {
            info!(host = %tenant.host(), id = %id, "Deleted DNS record");
        }
        Ok(deleted)
    }
}
