// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Wire types of the admin API.
//!
//! Every endpoint takes a JSON object. Envelope keys an endpoint does not
//! know are ignored; `accessKey`, `id` and `patternId` of any type other
//! than string are treated as absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::payload::lenient_string;

/// `POST /api/createDomain`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Requested label; generated when absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// Body of every endpoint that needs nothing but the key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyRequest {
    #[serde(
        rename = "accessKey",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub access_key: Option<String>,
}

/// `getRequests`, `getDNSRequests`, `getSMTPRequests`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadbackRequest {
    #[serde(
        rename = "accessKey",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub access_key: Option<String>,

    /// Unix seconds, as integer or string; validated by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// Kept as raw JSON: a non-string value still filters
    #[serde(rename = "patternId", default, skip_serializing_if = "Option::is_none")]
    pub pattern_id: Option<Value>,
}

/// `POST /api/updatePattern`: the new pattern under `response`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatternRequest {
    #[serde(
        rename = "accessKey",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub access_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

/// `POST /api/updateDnsRecord`: the new record under `record`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDnsRecordRequest {
    #[serde(
        rename = "accessKey",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub access_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Value>,
}

/// `deletePattern`, `deleteDnsRecord`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(
        rename = "accessKey",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub access_key: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    #[serde(rename = "accessKey")]
    pub access_key: String,
    pub host: String,
}

/// `POST /api/getDomain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub host: String,
    #[serde(rename = "requestCountHttp")]
    pub request_count_http: u64,
    #[serde(rename = "requestCountDns")]
    pub request_count_dns: u64,
    #[serde(rename = "requestCountSmtp")]
    pub request_count_smtp: u64,
}

/// Result of an update.
///
/// `success` is true only when a stored field actually changed. `matched`
/// tells an unchanged resource (`true`) apart from a missing one (`false`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_ignores_unknown_and_mistyped_keys() {
        let request: ReadbackRequest = serde_json::from_value(json!({
            "accessKey": 42,
            "after": "150",
            "patternId": ["p1"],
            "page": 2
        }))
        .unwrap();

        assert_eq!(request.access_key, None);
        assert_eq!(request.after, Some(json!("150")));
        assert_eq!(request.pattern_id, Some(json!(["p1"])));
    }

    #[test]
    fn test_summary_uses_camel_case_counters() {
        let summary = DomainSummary {
            host: "a.collab.test".to_string(),
            request_count_http: 3,
            request_count_dns: 2,
            request_count_smtp: 1,
        };
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({
                "host": "a.collab.test",
                "requestCountHttp": 3,
                "requestCountDns": 2,
                "requestCountSmtp": 1
            })
        );
    }
}
