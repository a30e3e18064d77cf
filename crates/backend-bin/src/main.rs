//! Tokio / Axum entry-point for the credvault server.
use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use credvault_backend_lib::{config::Settings, create_router, logging, AppState};
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "credvault")]
#[command(about = "Username/password registration and login service", long_about = None)]
struct Cli {
    /// TOML config file (defaults to ./credvault.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen host, overrides config and environment
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides config and environment
    #[arg(short, long)]
    port: Option<u16>,

    /// Path of the JSON credential store
    #[arg(long)]
    data_file: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Settings::load().context("failed to load configuration")?,
        };

        if let Some(host) = &self.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(path) = &self.data_file {
            settings.storage.path = path.clone();
        }
        settings.validate()?;
        Ok(settings)
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;

    logging::init(&settings.logging)?;

    let state = Arc::new(AppState::from_settings(&settings)?);
    tracing::info!(
        store = %settings.storage.path.display(),
        algorithm = ?settings.hashing.algorithm,
        "credential store ready"
    );

    let app = create_router(state);

    let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port))
        .await
        .with_context(|| {
            format!(
                "failed to bind {}:{}",
                settings.server.host, settings.server.port
            )
        })?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
