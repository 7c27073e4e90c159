// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Access Gate
//!
//! Resolves the bearer access key carried by every tenant-scoped request to
//! the single domain it controls. Services take a [`Tenant`] rather than a
//! raw host, and a `Tenant` can only be obtained here, so no operation can
//! run against a host whose key was not presented.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::error::AdminError;
use crate::domain::repository::DomainRepository;
use crate::domain::tenant::{AccessKey, Domain, Host};

/// A domain whose access key has been verified for the current request.
#[derive(Debug, Clone)]
pub struct Tenant {
    domain: Domain,
}

impl Tenant {
    pub fn host(&self) -> &Host {
        &self.domain.host
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }
}

#[derive(Clone)]
pub struct AccessGate {
    domains: Arc<dyn DomainRepository>,
}

impl AccessGate {
    pub fn new(domains: Arc<dyn DomainRepository>) -> Self {
        Self { domains }
    }

    /// Exact-match lookup of `access_key`. Missing, empty and unknown keys
    /// are all [`AdminError::Unauthorized`].
    pub async fn authorize(&self, access_key: Option<&str>) -> Result<Tenant, AdminError> {
        let key = match access_key {
            Some(key) if !key.is_empty() => AccessKey::new(key),
            _ => {
                warn!("Rejected request without access key");
                return Err(AdminError::Unauthorized);
            }
        };

        match self.domains.find_by_access_key(&key).await? {
            Some(domain) => {
                debug!(host = %domain.host, "Access key accepted");
                Ok(Tenant { domain })
            }
            None => {
                warn!("Rejected request with unknown access key");
                Err(AdminError::Unauthorized)
            }
        }
    }
}
