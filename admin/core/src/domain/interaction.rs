// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Captured interactions (read-only).
//!
//! The capture pipeline appends one record per HTTP request, DNS query and
//! SMTP session it sees for a tenant host. This crate never writes them in
//! production; it only reads them back, optionally windowed by time.
//!
//! On the wire timestamps are integer Unix seconds and binary payloads are
//! standard base64.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::AdminError;
use crate::domain::tenant::Host;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpInteraction {
    pub host: Host,
    #[serde(with = "unix_seconds")]
    pub timestamp: DateTime<Utc>,
    /// Pattern that answered the request, if any matched.
    #[serde(rename = "patternid", default, skip_serializing_if = "Option::is_none")]
    pub pattern_id: Option<String>,
    #[serde(rename = "remoteaddr", default, skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
    #[serde(rename = "rawrequest", with = "base64_bytes")]
    pub raw_request: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsInteraction {
    pub host: Host,
    #[serde(with = "unix_seconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "remoteaddr", default, skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
    /// Queried name, as received.
    pub name: String,
    /// Queried RR type, e.g. `A` or `TXT`.
    #[serde(rename = "type")]
    pub query_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpInteraction {
    pub host: Host,
    #[serde(with = "unix_seconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "remoteaddr", default, skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Anything carrying a capture timestamp.
pub trait Captured {
    fn captured_at(&self) -> DateTime<Utc>;
}

impl Captured for HttpInteraction {
    fn captured_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Captured for DnsInteraction {
    fn captured_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Captured for SmtpInteraction {
    fn captured_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Per-stream totals for one host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionCounts {
    pub http: u64,
    pub dns: u64,
    pub smtp: u64,
}

/// Lower time bound of a readback query (exclusive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct After(Option<DateTime<Utc>>);

impl After {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(Some(instant))
    }

    /// Parse the `after` request parameter.
    ///
    /// Accepts an integer or a decimal string of Unix seconds. Absent,
    /// `null`, `false`, `0` and `""` all mean "no lower bound" and `true`
    /// counts as one second. Anything else that does not parse is
    /// [`AdminError::InvalidParameter`].
    pub fn from_param(param: Option<&Value>) -> Result<Self, AdminError> {
        let seconds = match param {
            None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(Self::none()),
            Some(Value::Bool(true)) => 1,
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| AdminError::InvalidParameter(n.to_string()))?,
            Some(Value::String(s)) if s.is_empty() => return Ok(Self::none()),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| AdminError::InvalidParameter(s.clone()))?,
            Some(other) => return Err(AdminError::InvalidParameter(other.to_string())),
        };

        if seconds == 0 {
            return Ok(Self::none());
        }

        DateTime::from_timestamp(seconds, 0)
            .map(Self::at)
            .ok_or_else(|| AdminError::InvalidParameter(seconds.to_string()))
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    /// Strictly-after check used by in-memory stores.
    pub fn admits(&self, timestamp: DateTime<Utc>) -> bool {
        self.0.is_none_or(|after| timestamp > after)
    }
}

/// Filter for HTTP readback. DNS and SMTP only support `after`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpQuery {
    pub after: After,
    pub pattern_id: Option<String>,
}

/// The `patternId` readback parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternFilter {
    /// Absent or falsy: no filter.
    Any,
    Id(String),
    /// A truthy non-string. No stored pattern id can equal it.
    Unmatchable,
}

impl PatternFilter {
    /// Falsy values (`null`, `false`, `0`, `""`, `[]`, `{}`) mean no filter.
    /// Any other non-string value still filters, and matches nothing.
    pub fn from_param(param: Option<&Value>) -> Self {
        match param {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Self::Any,
            Some(Value::String(s)) if s.is_empty() => Self::Any,
            Some(Value::String(s)) => Self::Id(s.clone()),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Self::Any,
            Some(Value::Array(items)) if items.is_empty() => Self::Any,
            Some(Value::Object(fields)) if fields.is_empty() => Self::Any,
            Some(_) => Self::Unmatchable,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// Integer Unix seconds on the wire; sub-second precision is dropped.
pub mod unix_seconds {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(ts.timestamp())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        DateTime::from_timestamp(secs, 0).ok_or_else(|| D::Error::custom("timestamp out of range"))
    }
}

/// Standard base64 for opaque binary payloads.
pub mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_after_absent_or_falsy_means_unbounded() {
        for param in [
            None,
            Some(Value::Null),
            Some(json!(false)),
            Some(json!(0)),
            Some(json!("")),
            Some(json!("0")),
        ] {
            assert_eq!(After::from_param(param.as_ref()).unwrap(), After::none());
        }
    }

    #[test]
    fn test_after_accepts_int_and_numeric_string() {
        let expected = After::at(Utc.timestamp_opt(150, 0).unwrap());
        assert_eq!(After::from_param(Some(&json!(150))).unwrap(), expected);
        assert_eq!(After::from_param(Some(&json!("150"))).unwrap(), expected);
        assert_eq!(After::from_param(Some(&json!(" 150 "))).unwrap(), expected);
    }

    #[test]
    fn test_after_rejects_garbage() {
        for param in [json!("yesterday"), json!(1.5), json!([150]), json!(i64::MAX)] {
            assert!(matches!(
                After::from_param(Some(&param)),
                Err(AdminError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_after_true_is_one_second() {
        let expected = After::at(Utc.timestamp_opt(1, 0).unwrap());
        assert_eq!(After::from_param(Some(&json!(true))).unwrap(), expected);
    }

    #[test]
    fn test_pattern_filter_truthiness() {
        for param in [None, Some(Value::Null), Some(json!(false)), Some(json!(0)), Some(json!(""))] {
            assert_eq!(PatternFilter::from_param(param.as_ref()), PatternFilter::Any);
        }
        assert_eq!(
            PatternFilter::from_param(Some(&json!("p1"))),
            PatternFilter::Id("p1".to_string())
        );
        for param in [json!(7), json!(true), json!(1.5), json!(["p1"]), json!({"id": "p1"})] {
            assert_eq!(PatternFilter::from_param(Some(&param)), PatternFilter::Unmatchable);
        }
    }

    #[test]
    fn test_after_is_strict() {
        let after = After::at(Utc.timestamp_opt(200, 0).unwrap());
        assert!(!after.admits(Utc.timestamp_opt(200, 0).unwrap()));
        assert!(after.admits(Utc.timestamp_opt(200, 500_000_000).unwrap()));
        assert!(after.admits(Utc.timestamp_opt(201, 0).unwrap()));
        assert!(After::none().admits(Utc.timestamp_opt(0, 0).unwrap()));
    }

    #[test]
    fn test_http_interaction_wire_format() {
        let interaction = HttpInteraction {
            host: Host::new("a.collab.test"),
            timestamp: Utc.timestamp_opt(1_700_000_000, 750_000_000).unwrap(),
            pattern_id: Some("p1".to_string()),
            remote_addr: None,
            raw_request: b"GET / HTTP/1.1\r\n\r\n".to_vec(),
        };

        let value = serde_json::to_value(&interaction).unwrap();
        assert_eq!(value["timestamp"], 1_700_000_000);
        assert_eq!(value["rawrequest"], "R0VUIC8gSFRUUC8xLjENCg0K");
        assert_eq!(value["patternid"], "p1");
        assert!(value.get("remoteaddr").is_none());
    }

    #[test]
    fn test_smtp_payload_round_trip() {
        let interaction = SmtpInteraction {
            host: Host::new("a.collab.test"),
            timestamp: Utc.timestamp_opt(10, 0).unwrap(),
            remote_addr: Some("192.0.2.1".to_string()),
            data: vec![0, 159, 146, 150],
        };

        let json = serde_json::to_string(&interaction).unwrap();
        let parsed: SmtpInteraction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, interaction);
    }
}
