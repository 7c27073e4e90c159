// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Collab admin CLI

pub mod config;
pub mod dns;
pub mod domain;
pub mod pattern;
pub mod requests;
pub mod serve;

pub use self::config::ConfigCommand;
pub use self::dns::DnsCommand;
pub use self::domain::DomainCommand;
pub use self::pattern::PatternCommand;
pub use self::requests::RequestsCommand;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use collab_admin_sdk::{CollabClient, UpdateResponse};

/// Connection settings shared by every client subcommand
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Admin API base URL
    #[arg(
        long,
        global = true,
        env = "COLLAB_SERVER",
        default_value = "http://127.0.0.1:5000"
    )]
    pub server: String,

    /// Domain access key
    #[arg(long, global = true, env = "COLLAB_ACCESS_KEY", hide_env_values = true)]
    pub key: Option<String>,
}

impl ClientArgs {
    /// Client without a key, for registration
    pub fn anonymous_client(&self) -> CollabClient {
        CollabClient::new(&self.server)
    }

    /// Client carrying the access key; fails early if none was given
    pub fn client(&self) -> Result<CollabClient> {
        match &self.key {
            Some(key) if !key.is_empty() => Ok(CollabClient::new(&self.server).with_access_key(key)),
            _ => anyhow::bail!("An access key is required (use --key or COLLAB_ACCESS_KEY)"),
        }
    }
}

/// Placeholder for unset optional fields in tables
pub(crate) fn or_unset(value: Option<impl ToString>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub(crate) fn print_update(id: &str, response: UpdateResponse) {
    if response.success {
        println!("{}", format!("✓ {} updated", id).green());
    } else if response.matched {
        println!("{}", format!("{} already matches; nothing changed", id).yellow());
    } else {
        println!("{}", format!("✗ {} not found for this domain", id).red());
    }
}

pub(crate) fn print_delete(id: &str, deleted: bool) {
    if deleted {
        println!("{}", format!("✓ {} deleted", id).green());
    } else {
        println!("{}", format!("✗ {} not found for this domain", id).red());
    }
}
