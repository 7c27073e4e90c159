// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod access_gate;
pub mod dns_record_service;
pub mod domain_registry;
pub mod interaction_service;
pub mod pattern_service;
pub mod repository_factory;

// Re-export services for convenience
pub use access_gate::{AccessGate, Tenant};
pub use dns_record_service::{DnsRecordService, StandardDnsRecordService};
pub use domain_registry::{DomainRegistry, Registration, StandardDomainRegistry};
pub use interaction_service::{InteractionService, StandardInteractionService};
pub use pattern_service::{PatternService, StandardPatternService};
pub use repository_factory::{AdminServices, Repositories};
