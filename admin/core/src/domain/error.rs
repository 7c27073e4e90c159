// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use thiserror::Error;

use crate::domain::repository::RepositoryError;

/// Failures surfaced to API callers.
///
/// Every variant except `Repository` is raised before any write happens.
/// "Nothing matched" on update/delete is not an error; see
/// [`crate::domain::payload::UpdateOutcome`].
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid host: {0}")]
    InvalidHost(String),

    #[error("domain already exists")]
    DuplicateDomain,

    #[error("invalid access key")]
    Unauthorized,

    #[error("invalid after parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid response type: {0}")]
    InvalidVariant(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AdminError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}
