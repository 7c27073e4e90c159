// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Collab Admin CLI
//!
//! The `collab-admin` binary both serves the admin API and drives it.
//!
//! ## Commands
//!
//! - `collab-admin serve` - Run the admin API server
//! - `collab-admin config show|validate` - Configuration management
//! - `collab-admin domain create|info` - Register a domain, show its counters
//! - `collab-admin pattern list|create|update|delete` - Response patterns
//! - `collab-admin dns list|create|update|delete` - DNS records
//! - `collab-admin requests http|dns|smtp` - Read captured interactions
//!
//! Client commands talk to `--server` with the access key from `--key` or
//! `COLLAB_ACCESS_KEY`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use collab_admin::commands::{
    self, ClientArgs, ConfigCommand, DnsCommand, DomainCommand, PatternCommand, RequestsCommand,
};
use collab_core::domain::admin_config::AdminConfig;

/// Collab admin - manage out-of-band interaction capture domains
#[derive(Parser)]
#[command(name = "collab-admin")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the
    /// configured level when serving and `warn` otherwise
    #[arg(long, global = true, env = "COLLAB_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the admin API server
    #[command(name = "serve")]
    Serve {
        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Domain registration
    #[command(name = "domain")]
    Domain {
        #[command(subcommand)]
        command: DomainCommand,
    },

    /// Response pattern management
    #[command(name = "pattern")]
    Pattern {
        #[command(subcommand)]
        command: PatternCommand,
    },

    /// DNS record management
    #[command(name = "dns")]
    Dns {
        #[command(subcommand)]
        command: DnsCommand,
    },

    /// Captured interaction readback
    #[command(name = "requests")]
    Requests {
        #[command(subcommand)]
        command: RequestsCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        eprintln!("{}", "No command specified. Use --help for usage.".yellow());
        std::process::exit(1);
    };

    // The server logs with its configured format; client commands stay quiet
    if !matches!(command, Commands::Serve { .. }) {
        init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
    }

    match command {
        Commands::Serve { port, bind } => {
            let config = AdminConfig::load_or_default(cli.config)
                .context("Failed to load configuration")?;
            let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
            init_logging(level, &config.logging.format)?;
            commands::serve::run(config, port, bind).await
        }
        Commands::Config { command } => commands::config::handle_command(command, cli.config).await,
        Commands::Domain { command } => commands::domain::handle_command(command, &cli.client).await,
        Commands::Pattern { command } => commands::pattern::handle_command(command, &cli.client).await,
        Commands::Dns { command } => commands::dns::handle_command(command, &cli.client).await,
        Commands::Requests { command } => {
            commands::requests::handle_command(command, &cli.client).await
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        "json" => builder.json().init(),
        _ => builder.compact().init(),
    }

    Ok(())
}
