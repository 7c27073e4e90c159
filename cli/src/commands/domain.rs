// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::ClientArgs;

#[derive(Subcommand)]
pub enum DomainCommand {
    /// Register a new domain and print its access key
    Create {
        /// Requested label (random when omitted)
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// Show the domain owning the access key and its interaction counters
    Info,
}

pub async fn handle_command(command: DomainCommand, args: &ClientArgs) -> Result<()> {
    match command {
        DomainCommand::Create { name } => create(name, args).await,
        DomainCommand::Info => info(args).await,
    }
}

async fn create(name: Option<String>, args: &ClientArgs) -> Result<()> {
    let registration = args
        .anonymous_client()
        .create_domain(name.as_deref())
        .await?;

    println!("{}", format!("✓ Registered {}", registration.host).green());
    println!("  Access key: {}", registration.access_key.bold());
    println!(
        "{}",
        "  Store this key now; it cannot be shown again.".yellow()
    );

    Ok(())
}

async fn info(args: &ClientArgs) -> Result<()> {
    let summary = args.client()?.get_domain().await?;

    println!("{}", summary.host.bold());
    println!("  HTTP requests: {}", summary.request_count_http);
    println!("  DNS queries:   {}", summary.request_count_dns);
    println!("  SMTP sessions: {}", summary.request_count_smtp);

    Ok(())
}
