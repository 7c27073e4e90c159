// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use collab_core::domain::admin_config::{AdminConfig, StorageConfig};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,

        /// Print the effective configuration as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths, yaml } => show(config_override, paths, yaml).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool, yaml: bool) -> Result<()> {
    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  --config flag: {}", path.display()),
            None => println!("  --config flag: {}", "(not set)".dimmed()),
        }
        for (index, path) in AdminConfig::candidate_paths().iter().enumerate() {
            let marker = if path.exists() { "found".green() } else { "missing".dimmed() };
            println!("  {}. {} ({})", index + 1, path.display(), marker);
        }
        println!();
    }

    let config = AdminConfig::load_or_default(config_override)
        .context("Failed to load configuration")?;

    if yaml {
        print!("{}", config.to_yaml_string()?);
        return Ok(());
    }

    println!("{}", "Current configuration:".bold());
    println!();
    println!(
        "  Base domain: {}",
        if config.base_domain.is_empty() {
            "(not set)".red().to_string()
        } else {
            config.base_domain.clone()
        }
    );
    println!("  Listen: {}:{}", config.server.bind_address, config.server.port);
    match &config.storage {
        StorageConfig::InMemory => println!("  Storage: in-memory"),
        StorageConfig::Postgres { max_connections, .. } => {
            println!("  Storage: postgres (max {} connections)", max_connections)
        }
    }
    println!("  Logging: {} ({})", config.logging.level, config.logging.format);

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = AdminConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validate_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yaml");
        std::fs::write(&good, "base_domain: collab.test\n").unwrap();
        assert!(validate(Some(good)).await.is_ok());

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "base_domain: collab.test\nlogging:\n  format: xml\n").unwrap();
        assert!(validate(Some(bad)).await.is_err());
    }
}
