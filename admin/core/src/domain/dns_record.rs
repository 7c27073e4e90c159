// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! DNS records served by the live resolver for a tenant host.
//!
//! A record's answer is a sum type over two shapes:
//!
//! | `responsetype` | Fields |
//! |----------------|--------|
//! | `static`  | `name`, `type`, `value`, `ttl` |
//! | `rebind`  | `name`, `type`, `value1`, `value2` |
//!
//! Updates replace the whole shape, so switching variant can never leave
//! fields of the previous variant behind. How `rebind` alternates between
//! its two values is up to the resolver.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::AdminError;
use crate::domain::payload::{schema_error, ResourceId};
use crate::domain::tenant::Host;

pub const DEFAULT_RECORD_NAME: &str = "@";
pub const DEFAULT_RECORD_TYPE: &str = "TXT";
pub const DEFAULT_TTL: &str = "3600";

const RESPONSE_TYPE_KEYS: &[&str] = &["responsetype", "responseType"];

/// Record TTL. Stored and served as a decimal string; clients may send a
/// string or a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ttl(String);

impl Ttl {
    pub fn new(ttl: impl Into<String>) -> Self {
        Self(ttl.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Ttl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(u32),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) => Ttl(secs.to_string()),
            Raw::Text(text) => Ttl(text),
        })
    }
}

/// Discriminator between the two record shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Static,
    Rebind,
}

impl ResponseType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Rebind => "rebind",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, AdminError> {
        match raw {
            "static" => Ok(Self::Static),
            "rebind" => Ok(Self::Rebind),
            other => Err(AdminError::InvalidVariant(other.to_string())),
        }
    }
}

/// Variant-specific answer data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "responsetype", rename_all = "lowercase")]
pub enum DnsAnswer {
    Static(StaticAnswer),
    Rebind(RebindAnswer),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Ttl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebindAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
}

impl DnsAnswer {
    pub fn response_type(&self) -> ResponseType {
        match self {
            Self::Static(_) => ResponseType::Static,
            Self::Rebind(_) => ResponseType::Rebind,
        }
    }
}

/// The full canonical field set of a record (everything but `id`/`host`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,

    #[serde(flatten)]
    pub answer: DnsAnswer,
}

// Per-variant update schemas. Kept separate from the stored shape so that a
// field belonging to the other variant is an error rather than ignored.

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticUpdate {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    record_type: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    ttl: Option<Ttl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RebindUpdate {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    record_type: Option<String>,
    #[serde(default)]
    value1: Option<String>,
    #[serde(default)]
    value2: Option<String>,
}

impl DnsRecordShape {
    /// Parse the non-identity part of an update payload.
    ///
    /// A missing `responsetype` means `static`; a non-string or unknown one
    /// is [`AdminError::InvalidVariant`]. The remaining keys must belong to
    /// the selected variant.
    pub fn from_update(mut fields: Map<String, Value>) -> Result<Self, AdminError> {
        let mut discriminator = None;
        for key in RESPONSE_TYPE_KEYS {
            if let Some(raw) = fields.remove(*key) {
                discriminator.get_or_insert(raw);
            }
        }

        let response_type = match discriminator {
            None => ResponseType::Static,
            Some(Value::String(raw)) => ResponseType::parse(&raw)?,
            Some(other) => return Err(AdminError::InvalidVariant(other.to_string())),
        };

        let fields = Value::Object(fields);
        let shape = match response_type {
            ResponseType::Static => {
                let update: StaticUpdate =
                    serde_json::from_value(fields).map_err(|e| schema_error("static record", e))?;
                Self {
                    name: update.name,
                    record_type: update.record_type,
                    answer: DnsAnswer::Static(StaticAnswer {
                        value: update.value,
                        ttl: update.ttl,
                    }),
                }
            }
            ResponseType::Rebind => {
                let update: RebindUpdate =
                    serde_json::from_value(fields).map_err(|e| schema_error("rebind record", e))?;
                Self {
                    name: update.name,
                    record_type: update.record_type,
                    answer: DnsAnswer::Rebind(RebindAnswer {
                        value1: update.value1,
                        value2: update.value2,
                    }),
                }
            }
        };

        Ok(shape)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub host: Host,
    pub id: ResourceId,
    #[serde(flatten)]
    pub shape: DnsRecordShape,
}

impl DnsRecord {
    /// New static `TXT` record at the zone apex with an empty value.
    pub fn new(host: Host) -> Self {
        Self {
            host,
            id: ResourceId::generate(),
            shape: DnsRecordShape {
                name: Some(DEFAULT_RECORD_NAME.to_string()),
                record_type: Some(DEFAULT_RECORD_TYPE.to_string()),
                answer: DnsAnswer::Static(StaticAnswer {
                    value: Some(String::new()),
                    ttl: Some(Ttl::new(DEFAULT_TTL)),
                }),
            },
        }
    }

    pub fn with_shape(&self, shape: DnsRecordShape) -> Self {
        Self {
            host: self.host.clone(),
            id: self.id.clone(),
            shape,
        }
    }

    pub fn response_type(&self) -> ResponseType {
        self.shape.answer.response_type()
    }
}
