// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Collab Admin Rust SDK
//!
//! Typed async client for the admin API: register a domain, read captured
//! traffic and manage response patterns and DNS records with its access key.

pub mod client;
pub mod types;

pub use client::CollabClient;
pub use types::*;
