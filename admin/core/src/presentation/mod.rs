// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`collab-admin-core`)
//!
//! HTTP surface that translates admin API requests into application service
//! calls. No business logic lives here; handlers parse the envelope, pass
//! the access key through the gate and delegate.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Axum router, handlers and error-to-status mapping |
//! | [`dto`] | Request envelopes and response bodies, shared with the SDK |

pub mod api;
pub mod dto;
