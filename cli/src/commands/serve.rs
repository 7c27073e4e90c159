// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `collab-admin serve`: run the admin HTTP API until Ctrl+C or SIGTERM

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use collab_core::application::repository_factory::{AdminServices, Repositories};
use collab_core::domain::admin_config::AdminConfig;
use collab_core::presentation::api::app;

pub async fn run(config: AdminConfig, port: Option<u16>, bind: Option<String>) -> Result<()> {
    config
        .validate()
        .context("Configuration validation failed")?;

    info!("Configuration loaded: base_domain={}", config.base_domain);

    let repositories = Repositories::from_backend(&config.storage.to_backend())
        .await
        .context("Failed to initialize storage")?;
    let services = AdminServices::new(config.base_domain.clone(), repositories);

    let addr = format!(
        "{}:{}",
        bind.unwrap_or(config.server.bind_address),
        port.unwrap_or(config.server.port)
    );
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Admin API listening on {}", addr);

    axum::serve(listener, app(services))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Admin API shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
