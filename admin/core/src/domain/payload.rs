// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Resource identifiers and the shared shape of update payloads.
//!
//! Updates arrive as a JSON object carrying the resource `id` plus the
//! fields the caller wants the resource to have. Parsing happens in two
//! steps so that shape errors are reported before authorization and field
//! errors after it:
//!
//! 1. [`UpdateEnvelope::from_payload`] checks the object and extracts `id`
//! 2. the resource module parses the remaining fields against its schema

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::error::AdminError;

/// Identifier of a pattern or DNS record: hex SHA-256 of 16 random bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn generate() -> Self {
        let mut seed = [0u8; 16];
        OsRng.fill_bytes(&mut seed);
        Self(hex::encode(Sha256::digest(seed)))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Read-only identity keys a client may echo back; they never change a
/// resource. Ownership always comes from the access key.
const IDENTITY_FIELDS: &[&str] = &["id", "host"];

/// An update payload whose shape has been checked but whose fields have not.
#[derive(Debug, Clone)]
pub struct UpdateEnvelope {
    pub id: ResourceId,
    pub fields: Map<String, Value>,
}

impl UpdateEnvelope {
    /// Requires a non-empty object with a non-empty string `id`.
    pub fn from_payload(payload: Option<Value>) -> Result<Self, AdminError> {
        let mut fields = match payload {
            Some(Value::Object(map)) if !map.is_empty() => map,
            _ => return Err(AdminError::invalid_request("missing resource payload")),
        };

        let id = match fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => ResourceId::new(id.clone()),
            _ => return Err(AdminError::invalid_request("resource payload has no id")),
        };

        for key in IDENTITY_FIELDS {
            fields.remove(*key);
        }

        Ok(Self { id, fields })
    }
}

/// Result of applying an update to a stored resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// At least one field changed.
    Updated,
    /// The resource exists but already had exactly this shape.
    Unchanged,
    /// No resource with this id belongs to the caller's host.
    NotFound,
}

impl UpdateOutcome {
    /// Wire-level `success`: true only if something was modified.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Updated)
    }

    pub fn matched(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Deserialize an optional string, dropping values of any other JSON type.
///
/// Used for envelope fields (`accessKey`, `id`) where a wrongly
/// typed value is treated the same as an absent one.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Map a serde error from a field-schema parse into `InvalidRequest`.
pub(crate) fn schema_error(resource: &str, err: serde_json::Error) -> AdminError {
    AdminError::InvalidRequest(format!("invalid {} fields: {}", resource, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_ids_are_hex_sha256() {
        let id = ResourceId::generate();
        assert_eq!(id.as_str().len(), 64);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, ResourceId::generate());
    }

    #[test]
    fn test_envelope_requires_payload() {
        for payload in [None, Some(Value::Null), Some(json!({})), Some(json!("x")), Some(json!([1]))] {
            assert!(matches!(
                UpdateEnvelope::from_payload(payload),
                Err(AdminError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_envelope_requires_string_id() {
        for payload in [json!({"pattern": "x"}), json!({"id": ""}), json!({"id": 7})] {
            assert!(matches!(
                UpdateEnvelope::from_payload(Some(payload)),
                Err(AdminError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_envelope_strips_identity_fields() {
        let envelope = UpdateEnvelope::from_payload(Some(json!({
            "id": "abc",
            "host": "someone-else.collab.test",
            "pattern": "^/x"
        })))
        .unwrap();

        assert_eq!(envelope.id.as_str(), "abc");
        assert_eq!(envelope.fields.len(), 1);
        assert!(envelope.fields.contains_key("pattern"));
    }

    #[test]
    fn test_update_outcome_flags() {
        assert!(UpdateOutcome::Updated.is_success());
        assert!(!UpdateOutcome::Unchanged.is_success());
        assert!(UpdateOutcome::Unchanged.matched());
        assert!(!UpdateOutcome::NotFound.matched());
    }

    #[test]
    fn test_lenient_string_drops_non_strings() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "lenient_string")]
            value: Option<String>,
        }

        let parsed: Probe = serde_json::from_value(json!({"value": "k"})).unwrap();
        assert_eq!(parsed.value.as_deref(), Some("k"));
        for value in [json!(1), json!(true), json!({"a": 1}), Value::Null] {
            let parsed: Probe = serde_json::from_value(json!({ "value": value })).unwrap();
            assert!(parsed.value.is_none());
        }
        let parsed: Probe = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.value.is_none());
    }
}
