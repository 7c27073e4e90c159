// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Collab Admin Core
//!
//! Control plane for the Collab out-of-band interaction capture service.
//! Tenants own a subdomain of the shared base domain and manage it with an
//! opaque access key: they read captured HTTP/DNS/SMTP traffic, and shape the
//! live responder with response patterns and DNS records.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Wires the domain, application, infrastructure and
//!   presentation layers into one library

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
