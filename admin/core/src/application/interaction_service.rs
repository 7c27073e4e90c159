// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Interaction Readback Application Service
//!
//! Reads captured HTTP, DNS and SMTP traffic for an authorized tenant.
//!
//! DNS and SMTP interactions carry no pattern id, so a readback of those
//! streams that names a `patternId` matches nothing and returns an empty
//! list without looking at `after` at all. On HTTP, a `patternId` that is
//! not a string still filters, so it also yields an empty list.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::application::access_gate::Tenant;
use crate::domain::error::AdminError;
use crate::domain::interaction::{
    After, DnsInteraction, HttpInteraction, HttpQuery, PatternFilter, SmtpInteraction,
};
use crate::domain::repository::InteractionRepository;

#[async_trait]
pub trait InteractionService: Send + Sync {
    async fn list_http(
        &self,
        tenant: &Tenant,
        after: Option<&Value>,
        pattern_id: Option<&Value>,
    ) -> Result<Vec<HttpInteraction>, AdminError>;

    async fn list_dns(
        &self,
        tenant: &Tenant,
        after: Option<&Value>,
        pattern_id: Option<&Value>,
    ) -> Result<Vec<DnsInteraction>, AdminError>;

    async fn list_smtp(
        &self,
        tenant: &Tenant,
        after: Option<&Value>,
        pattern_id: Option<&Value>,
    ) -> Result<Vec<SmtpInteraction>, AdminError>;
}

pub struct StandardInteractionService {
    repository: Arc<dyn InteractionRepository>,
}

impl StandardInteractionService {
    pub fn new(repository: Arc<dyn InteractionRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl InteractionService for StandardInteractionService {
    async fn list_http(
        &self,
        tenant: &Tenant,
        after: Option<&Value>,
        pattern_id: Option<&Value>,
    ) -> Result<Vec<HttpInteraction>, AdminError> {
        let after = After::from_param(after)?;
        let pattern_id = match PatternFilter::from_param(pattern_id) {
            PatternFilter::Any => None,
            PatternFilter::Id(id) => Some(id),
            PatternFilter::Unmatchable => return Ok(Vec::new()),
        };
        let query = HttpQuery { after, pattern_id };

        let interactions = self.repository.find_http(tenant.host(), &query).await?;
        debug!(host = %tenant.host(), count = interactions.len(), "Read HTTP interactions");
        Ok(interactions)
    }

    async fn list_dns(
        &self,
        tenant: &Tenant,
        after: Option<&Value>,
        pattern_id: Option<&Value>,
    ) -> Result<Vec<DnsInteraction>, AdminError> {
        if !PatternFilter::from_param(pattern_id).is_any() {
            return Ok(Vec::new());
        }

        let interactions = self
            .repository
            .find_dns(tenant.host(), After::from_param(after)?)
            .await?;
        debug!(host = %tenant.host(), count = interactions.len(), "Read DNS interactions");
        Ok(interactions)
    }

    async fn list_smtp(
        &self,
        tenant: &Tenant,
        after: Option<&Value>,
        pattern_id: Option<&Value>,
    ) -> Result<Vec<SmtpInteraction>, AdminError> {
        if !PatternFilter::from_param(pattern_id).is_any() {
            return Ok(Vec::new());
        }

        let interactions = self
            .repository
            .find_smtp(tenant.host(), After::from_param(after)?)
            .await?;
        debug!(host = %tenant.host(), count = interactions.len(), "Read SMTP interactions");
        Ok(interactions)
    }
}
