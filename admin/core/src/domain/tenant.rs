// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tenant domains and their access keys.
//!
//! A tenant is nothing more than a registered subdomain of the shared base
//! domain plus the single bearer key that controls it. There are no user
//! accounts: holding the key is the authorization.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand_core::{OsRng, RngCore};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::domain::error::AdminError;

// ============================================================================
// Value Objects
// ============================================================================

/// Length of labels generated when the caller does not pick one.
pub const GENERATED_LABEL_LEN: usize = 16;

/// Entropy of a freshly minted access key.
pub const ACCESS_KEY_BYTES: usize = 32;

const LABEL_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const RESERVED_LABELS: &[&str] = &["www"];

fn label_regex() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("label regex is valid"))
}

/// The tenant-chosen left-most DNS label, already validated and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostLabel(String);

impl HostLabel {
    /// Validate a requested label, or generate one when none was given.
    pub fn from_request(requested: Option<&str>) -> Result<Self, AdminError> {
        match requested {
            None | Some("") => Ok(Self::generate()),
            Some(label) => Self::parse(label),
        }
    }

    pub fn parse(label: &str) -> Result<Self, AdminError> {
        if !label_regex().is_match(label) {
            return Err(AdminError::InvalidHost(format!(
                "'{}' may only contain letters, digits, '-' and '_'",
                label
            )));
        }
        if label.starts_with('_') {
            return Err(AdminError::InvalidHost(format!(
                "'{}' must not start with '_'",
                label
            )));
        }
        if RESERVED_LABELS.contains(&label) {
            return Err(AdminError::InvalidHost(format!("'{}' is reserved", label)));
        }
        Ok(Self(label.to_lowercase()))
    }

    /// Random lowercase alphanumeric label of [`GENERATED_LABEL_LEN`] chars.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let label = (0..GENERATED_LABEL_LEN)
            .map(|_| LABEL_ALPHABET[rng.random_range(0..LABEL_ALPHABET.len())] as char)
            .collect();
        Self(label)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compose the fully-qualified host under `base_domain`.
    pub fn qualify(&self, base_domain: &str) -> Host {
        Host(format!("{}.{}", self.0, base_domain))
    }
}

/// Fully-qualified tenant host, e.g. `abc123.collab.example`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Host(String);

impl Host {
    pub fn new(host: impl Into<String>) -> Self {
        Self(host.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Opaque bearer secret granting control of exactly one [`Domain`].
///
/// `Debug` is redacted so keys never end up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessKey(String);

impl AccessKey {
    /// Mint a new key from [`ACCESS_KEY_BYTES`] of OS randomness, URL-safe
    /// base64 encoded.
    pub fn generate() -> Self {
        let mut bytes = [0u8; ACCESS_KEY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE.encode(bytes))
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessKey(<redacted>)")
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// A registered tenant domain. Never updated after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub host: Host,
    pub access_key: AccessKey,
    pub created_at: DateTime<Utc>,
}

impl Domain {
    /// Register `label` under `base_domain` with a freshly minted key.
    pub fn register(label: &HostLabel, base_domain: &str) -> Self {
        Self {
            host: label.qualify(base_domain),
            access_key: AccessKey::generate(),
            created_at: Utc::now(),
        }
    }
}
