// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Response pattern commands
//!
//! `update` replaces the whole pattern: any option left out is cleared on
//! the server.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use collab_admin_sdk::{ExternalHandler, Pattern, PatternFields, ResourceId, ResponseHeader};

use super::{or_unset, ClientArgs};

#[derive(Subcommand)]
pub enum PatternCommand {
    /// List the domain's patterns
    List,

    /// Create a catch-all pattern with default fields
    Create,

    /// Replace a pattern's fields
    Update {
        /// Pattern ID
        #[arg(value_name = "ID")]
        id: String,

        /// Request regex
        #[arg(long)]
        pattern: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        priority: Option<i64>,

        /// Response body
        #[arg(long)]
        body: Option<String>,

        /// Response status code
        #[arg(long)]
        code: Option<u16>,

        /// Response header as "Name: value" (repeatable)
        #[arg(long = "header", value_name = "HEADER")]
        headers: Vec<String>,

        /// Delegate to a named external handler
        #[arg(long)]
        external_handler: Option<String>,
    },

    /// Delete a pattern
    Delete {
        /// Pattern ID
        #[arg(value_name = "ID")]
        id: String,
    },
}

pub async fn handle_command(command: PatternCommand, args: &ClientArgs) -> Result<()> {
    let client = args.client()?;

    match command {
        PatternCommand::List => {
            let patterns = client.patterns().await?;
            print_patterns(&patterns);
        }
        PatternCommand::Create => {
            let pattern = client.create_pattern().await?;
            println!("{}", format!("✓ Pattern {} created", pattern.id).green());
        }
        PatternCommand::Update {
            id,
            pattern,
            priority,
            body,
            code,
            headers,
            external_handler,
        } => {
            let fields = PatternFields {
                pattern,
                priority,
                response_body: body,
                response_code: code,
                response_headers: parse_headers(&headers)?,
                external_handler: external_handler.map(ExternalHandler::Named),
            };
            let response = client.update_pattern(&ResourceId::new(&id), &fields).await?;
            super::print_update(&id, response);
        }
        PatternCommand::Delete { id } => {
            let deleted = client.delete_pattern(&ResourceId::new(&id)).await?;
            super::print_delete(&id, deleted);
        }
    }

    Ok(())
}

/// `"Name: value"` pairs; no `--header` at all leaves headers unset.
fn parse_headers(raw: &[String]) -> Result<Option<Vec<ResponseHeader>>> {
    if raw.is_empty() {
        return Ok(None);
    }

    raw.iter()
        .map(|header| {
            let (key, value) = header
                .split_once(':')
                .with_context(|| format!("Invalid header '{}': expected 'Name: value'", header))?;
            Ok(ResponseHeader::new(key.trim(), value.trim()))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn print_patterns(patterns: &[Pattern]) {
    if patterns.is_empty() {
        println!("{}", "No patterns found".yellow());
        return;
    }

    println!("{} patterns found:", patterns.len());
    println!("{:<66} {:<8} {:<6} {}", "ID", "PRIORITY", "CODE", "PATTERN");

    for pattern in patterns {
        println!(
            "{:<66} {:<8} {:<6} {}",
            pattern.id,
            or_unset(pattern.fields.priority),
            or_unset(pattern.fields.response_code),
            or_unset(pattern.fields.pattern.as_deref()).bold()
        );
    }
}
