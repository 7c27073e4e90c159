// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Types
//!
//! Wire types shared with the server, plus the SDK error.

pub use collab_core::domain::dns_record::{
    DnsAnswer, DnsRecord, DnsRecordShape, RebindAnswer, ResponseType, StaticAnswer, Ttl,
};
pub use collab_core::domain::interaction::{DnsInteraction, HttpInteraction, SmtpInteraction};
pub use collab_core::domain::pattern::{ExternalHandler, Pattern, PatternFields, ResponseHeader};
pub use collab_core::domain::payload::ResourceId;
pub use collab_core::presentation::dto::{
    DeleteResponse, DomainSummary, RegistrationResponse, UpdateResponse,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollabError {
    /// The server answered with a non-2xx status and this `error` message
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CollabError {
    /// True for a rejected or unknown access key
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 403, message } if message == "invalid access key")
    }
}

pub type Result<T> = std::result::Result<T, CollabError>;
