// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! DNS record commands
//!
//! `update` replaces the record's whole shape, including its response type.
//! The options are checked against the chosen type before anything is sent.

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::{Map, Value};

use collab_admin_sdk::{DnsAnswer, DnsRecord, DnsRecordShape, ResourceId};

use super::{or_unset, ClientArgs};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResponseTypeArg {
    /// Fixed value and TTL
    Static,
    /// Alternates between `--value1` and `--value2`
    Rebind,
}

#[derive(Subcommand)]
pub enum DnsCommand {
    /// List the domain's DNS records
    List,

    /// Create a static TXT record at the apex
    Create,

    /// Replace a record's shape
    Update {
        /// Record ID
        #[arg(value_name = "ID")]
        id: String,

        #[arg(long = "response-type", value_enum, default_value_t = ResponseTypeArg::Static)]
        response_type: ResponseTypeArg,

        /// Record name relative to the domain (`@` for the apex)
        #[arg(long)]
        name: Option<String>,

        /// RR type, e.g. A, AAAA, TXT
        #[arg(long = "type")]
        record_type: Option<String>,

        /// Static answer value
        #[arg(long)]
        value: Option<String>,

        /// Static answer TTL in seconds
        #[arg(long)]
        ttl: Option<String>,

        /// First rebind answer
        #[arg(long)]
        value1: Option<String>,

        /// Second rebind answer
        #[arg(long)]
        value2: Option<String>,
    },

    /// Delete a record
    Delete {
        /// Record ID
        #[arg(value_name = "ID")]
        id: String,
    },
}

pub async fn handle_command(command: DnsCommand, args: &ClientArgs) -> Result<()> {
    let client = args.client()?;

    match command {
        DnsCommand::List => {
            let records = client.dns_records().await?;
            print_records(&records);
        }
        DnsCommand::Create => {
            let record = client.create_dns_record().await?;
            println!("{}", format!("✓ DNS record {} created", record.id).green());
        }
        DnsCommand::Update {
            id,
            response_type,
            name,
            record_type,
            value,
            ttl,
            value1,
            value2,
        } => {
            let shape = build_shape(
                response_type,
                [
                    ("name", name),
                    ("type", record_type),
                    ("value", value),
                    ("ttl", ttl),
                    ("value1", value1),
                    ("value2", value2),
                ],
            )?;
            let response = client.update_dns_record(&ResourceId::new(&id), &shape).await?;
            super::print_update(&id, response);
        }
        DnsCommand::Delete { id } => {
            let deleted = client.delete_dns_record(&ResourceId::new(&id)).await?;
            super::print_delete(&id, deleted);
        }
    }

    Ok(())
}

/// Validate the given options against the response type's field set.
fn build_shape<const N: usize>(
    response_type: ResponseTypeArg,
    options: [(&str, Option<String>); N],
) -> Result<DnsRecordShape> {
    let mut fields = Map::new();
    let discriminator = match response_type {
        ResponseTypeArg::Static => "static",
        ResponseTypeArg::Rebind => "rebind",
    };
    fields.insert("responsetype".to_string(), Value::from(discriminator));
    for (key, value) in options {
        if let Some(value) = value {
            fields.insert(key.to_string(), Value::String(value));
        }
    }

    Ok(DnsRecordShape::from_update(fields)?)
}

fn print_records(records: &[DnsRecord]) {
    if records.is_empty() {
        println!("{}", "No DNS records found".yellow());
        return;
    }

    println!("{} records found:", records.len());
    println!("{:<66} {:<8} {:<12} {:<6} {}", "ID", "KIND", "NAME", "TYPE", "ANSWER");

    for record in records {
        let answer = match &record.shape.answer {
            DnsAnswer::Static(answer) => format!(
                "{} (ttl {})",
                or_unset(answer.value.as_deref()),
                or_unset(answer.ttl.as_ref().map(|ttl| ttl.as_str()))
            ),
            DnsAnswer::Rebind(answer) => format!(
                "{} ⇄ {}",
                or_unset(answer.value1.as_deref()),
                or_unset(answer.value2.as_deref())
            ),
        };

        println!(
            "{:<66} {:<8} {:<12} {:<6} {}",
            record.id,
            record.response_type().as_str(),
            or_unset(record.shape.name.as_deref()),
            or_unset(record.shape.record_type.as_deref()),
            answer.bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_admin_sdk::{RebindAnswer, ResponseType};

    #[test]
    fn test_build_rebind_shape() {
        let shape = build_shape(
            ResponseTypeArg::Rebind,
            [
                ("type", Some("A".to_string())),
                ("value1", Some("203.0.113.1".to_string())),
                ("value2", Some("127.0.0.1".to_string())),
            ],
        )
        .unwrap();

        assert_eq!(shape.answer.response_type(), ResponseType::Rebind);
        assert_eq!(
            shape.answer,
            DnsAnswer::Rebind(RebindAnswer {
                value1: Some("203.0.113.1".to_string()),
                value2: Some("127.0.0.1".to_string()),
            })
        );
    }

    #[test]
    fn test_static_rejects_rebind_values() {
        let result = build_shape(
            ResponseTypeArg::Static,
            [("value1", Some("203.0.113.1".to_string()))],
        );
        assert!(result.is_err());
    }
}
