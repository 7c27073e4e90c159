// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Response patterns.
//!
//! A pattern tells the live HTTP responder how to answer probes for a host:
//! the responder picks matching patterns by regex and breaks ties with
//! `priority`. Every mutable field is optional because updates clear the
//! fields they omit; an absent field is simply not serialized.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::AdminError;
use crate::domain::payload::{schema_error, ResourceId};
use crate::domain::tenant::Host;

pub const DEFAULT_PATTERN: &str = ".*";
pub const DEFAULT_RESPONSE_CODE: u16 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub key: String,
    pub value: String,
}

impl ResponseHeader {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Delegation of response generation to an external handler: either a bare
/// on/off flag or the handler's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalHandler {
    Flag(bool),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub host: Host,
    pub id: ResourceId,
    #[serde(flatten)]
    pub fields: PatternFields,
}

/// The canonical mutable field set of a pattern.
///
/// Doubles as the update schema: unknown keys are rejected, and a missing
/// key deserializes to `None`, i.e. "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    #[serde(
        rename = "responsebody",
        alias = "responseBody",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response_body: Option<String>,

    #[serde(
        rename = "responsecode",
        alias = "responseCode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response_code: Option<u16>,

    #[serde(
        rename = "responseheaders",
        alias = "responseHeaders",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response_headers: Option<Vec<ResponseHeader>>,

    #[serde(
        rename = "externalHandler",
        alias = "externalhandler",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub external_handler: Option<ExternalHandler>,
}

impl PatternFields {
    /// Parse the non-identity part of an update payload.
    pub fn from_update(fields: Map<String, Value>) -> Result<Self, AdminError> {
        serde_json::from_value(Value::Object(fields)).map_err(|e| schema_error("pattern", e))
    }
}

impl Pattern {
    /// New catch-all pattern answering `200` with an empty HTML body.
    pub fn new(host: Host) -> Self {
        Self {
            host,
            id: ResourceId::generate(),
            fields: PatternFields {
                pattern: Some(DEFAULT_PATTERN.to_string()),
                priority: Some(0),
                response_body: Some(String::new()),
                response_code: Some(DEFAULT_RESPONSE_CODE),
                response_headers: Some(vec![ResponseHeader::new("Content-Type", "text/html")]),
                external_handler: None,
            },
        }
    }

    /// The pattern as it looks after replacing its whole field set.
    pub fn with_fields(&self, fields: PatternFields) -> Self {
        Self {
            host: self.host.clone(),
            id: self.id.clone(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Result<PatternFields, AdminError> {
        match value {
            Value::Object(map) => PatternFields::from_update(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_new_pattern_defaults() {
        let pattern = Pattern::new(Host::new("a.collab.test"));
        let value = serde_json::to_value(&pattern).unwrap();

        assert_eq!(value["host"], "a.collab.test");
        assert_eq!(value["pattern"], ".*");
        assert_eq!(value["priority"], 0);
        assert_eq!(value["responsebody"], "");
        assert_eq!(value["responsecode"], 200);
        assert_eq!(
            value["responseheaders"],
            json!([{"key": "Content-Type", "value": "text/html"}])
        );
        assert!(value.get("externalHandler").is_none());
        assert_eq!(value["id"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_omitted_fields_parse_as_unset() {
        let parsed = fields(json!({"pattern": "^/admin"})).unwrap();
        assert_eq!(parsed.pattern.as_deref(), Some("^/admin"));
        assert_eq!(parsed.priority, None);
        assert_eq!(parsed.response_body, None);
        assert_eq!(parsed.response_code, None);
        assert_eq!(parsed.response_headers, None);
        assert_eq!(parsed.external_handler, None);
    }

    #[test]
    fn test_camel_case_aliases_are_accepted() {
        let parsed = fields(json!({
            "responseBody": "hi",
            "responseCode": 404,
            "responseHeaders": [{"key": "X", "value": "y"}]
        }))
        .unwrap();
        assert_eq!(parsed.response_body.as_deref(), Some("hi"));
        assert_eq!(parsed.response_code, Some(404));
        assert_eq!(parsed.response_headers.unwrap().len(), 1);
    }

    #[test]
    fn test_external_handler_flag_or_name() {
        let flag = fields(json!({"externalHandler": true})).unwrap();
        assert_eq!(flag.external_handler, Some(ExternalHandler::Flag(true)));

        let named = fields(json!({"externalHandler": "webhook"})).unwrap();
        assert_eq!(
            named.external_handler,
            Some(ExternalHandler::Named("webhook".to_string()))
        );
    }

    #[test]
    fn test_unknown_or_mistyped_fields_are_rejected() {
        for payload in [
            json!({"value1": "x"}),
            json!({"priority": "high"}),
            json!({"responsecode": 70000}),
            json!({"responseheaders": "Content-Type: text/plain"}),
        ] {
            assert!(matches!(fields(payload), Err(AdminError::InvalidRequest(_))));
        }
    }

    #[test]
    fn test_with_fields_keeps_identity() {
        let pattern = Pattern::new(Host::new("a.collab.test"));
        let updated = pattern.with_fields(PatternFields::default());
        assert_eq!(updated.id, pattern.id);
        assert_eq!(updated.host, pattern.host);
        assert_eq!(updated.fields, PatternFields::default());
    }
}
