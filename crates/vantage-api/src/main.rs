//! Vantage API server.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vantage_api::seed::{self, DEMO_ACCOUNTS};
use vantage_api::{Backends, Config, ConfigArgs};

/// Vantage API server
#[derive(Parser, Debug)]
#[command(name = "vantage-api", version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// Seed the demo accounts at startup (memory backend only)
    #[arg(long, env = "VANTAGE_SEED")]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,vantage=debug")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config).context("Invalid configuration")?;
    let backends = Backends::from_config(&config).context("Failed to set up backends")?;

    if args.seed {
        seed_memory_backend(&backends).await?;
    }

    let app = vantage_api::app(&backends, &config)?;
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, backend = ?config.backend, "Vantage API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Vantage API stopped");
    Ok(())
}

/// Seed the in-process backend and log a bearer token per demo account.
async fn seed_memory_backend(backends: &Backends) -> Result<()> {
    let Some(provider) = &backends.memory else {
        anyhow::bail!("--seed is only supported with the memory backend; use `vantage seed`");
    };
    let report = seed::seed(backends.identity.as_ref(), backends.profiles().as_ref()).await;
    if !report.is_complete() {
        anyhow::bail!("Seeding failed: {report:?}");
    }
    for demo in &DEMO_ACCOUNTS {
        let token = provider.issue_token(demo.uid)?;
        tracing::info!(email = demo.email, role = %demo.role, status = %demo.status, token = %token, "Demo token");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
