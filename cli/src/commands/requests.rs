// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Captured interaction readback commands

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::Colorize;

use collab_admin_sdk::{DnsInteraction, HttpInteraction, SmtpInteraction};

use super::{or_unset, ClientArgs};

#[derive(Subcommand)]
pub enum RequestsCommand {
    /// Captured HTTP requests
    Http {
        /// Only requests after this Unix timestamp (seconds)
        #[arg(long)]
        after: Option<i64>,

        /// Only requests answered by this pattern
        #[arg(long)]
        pattern_id: Option<String>,

        /// Print the raw request bytes
        #[arg(long)]
        raw: bool,
    },

    /// Captured DNS queries
    Dns {
        #[arg(long)]
        after: Option<i64>,
    },

    /// Captured SMTP sessions
    Smtp {
        #[arg(long)]
        after: Option<i64>,

        /// Print the session transcript
        #[arg(long)]
        raw: bool,
    },
}

pub async fn handle_command(command: RequestsCommand, args: &ClientArgs) -> Result<()> {
    let client = args.client()?;

    match command {
        RequestsCommand::Http { after, pattern_id, raw } => {
            let requests = client.http_requests(after, pattern_id.as_deref()).await?;
            print_http(&requests, raw);
        }
        RequestsCommand::Dns { after } => {
            let queries = client.dns_requests(after).await?;
            print_dns(&queries);
        }
        RequestsCommand::Smtp { after, raw } => {
            let sessions = client.smtp_requests(after).await?;
            print_smtp(&sessions, raw);
        }
    }

    Ok(())
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// First line of a captured payload, e.g. the HTTP request line
fn first_line(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn print_http(requests: &[HttpInteraction], raw: bool) {
    if requests.is_empty() {
        println!("{}", "No HTTP requests captured".yellow());
        return;
    }

    println!("{:<12} {:<20} {:<18} {}", "UNIX", "TIME (UTC)", "FROM", "REQUEST");
    for request in requests {
        println!(
            "{:<12} {:<20} {:<18} {}",
            request.timestamp.timestamp(),
            format_timestamp(&request.timestamp),
            or_unset(request.remote_addr.as_deref()),
            first_line(&request.raw_request).bold()
        );
        if let Some(pattern_id) = &request.pattern_id {
            println!("  {} {}", "pattern:".dimmed(), pattern_id);
        }
        if raw {
            println!("{}", String::from_utf8_lossy(&request.raw_request));
        }
    }
}

fn print_dns(queries: &[DnsInteraction]) {
    if queries.is_empty() {
        println!("{}", "No DNS queries captured".yellow());
        return;
    }

    println!("{:<12} {:<20} {:<18} {:<6} {}", "UNIX", "TIME (UTC)", "FROM", "TYPE", "NAME");
    for query in queries {
        println!(
            "{:<12} {:<20} {:<18} {:<6} {}",
            query.timestamp.timestamp(),
            format_timestamp(&query.timestamp),
            or_unset(query.remote_addr.as_deref()),
            query.query_type,
            query.name.bold()
        );
    }
}

fn print_smtp(sessions: &[SmtpInteraction], raw: bool) {
    if sessions.is_empty() {
        println!("{}", "No SMTP sessions captured".yellow());
        return;
    }

    println!("{:<12} {:<20} {:<18} {}", "UNIX", "TIME (UTC)", "FROM", "BYTES");
    for session in sessions {
        println!(
            "{:<12} {:<20} {:<18} {}",
            session.timestamp.timestamp(),
            format_timestamp(&session.timestamp),
            or_unset(session.remote_addr.as_deref()),
            session.data.len()
        );
        if raw {
            println!("{}", String::from_utf8_lossy(&session.data));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(first_line(b"GET /x HTTP/1.1\r\nHost: a\r\n\r\n"), "GET /x HTTP/1.1");
        assert_eq!(first_line(b""), "");
    }
}
