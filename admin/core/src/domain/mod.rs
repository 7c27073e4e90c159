// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain Layer
//!
//! Aggregates, value objects and repository contracts. Nothing in here knows
//! about HTTP.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Tenant domains, response patterns, DNS records and captured
//!   interactions

pub mod admin_config;
pub mod dns_record;
pub mod error;
pub mod interaction;
pub mod pattern;
pub mod payload;
pub mod repository;
pub mod tenant;
