//! Binary crate for the rainlens HTTP service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging and configuration at startup
//! - The axum router with the two inbound endpoints

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use rainlens_core::Config;
use tracing::info;

mod routes;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "rainlens-server", version, about = "Rain-report slash-command service")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".parse().expect("valid default filter"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = Config::from_env().context("configuration validation failed")?;
    let state = routes::AppState::build(config).await?;

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!(bind = %args.bind, "listening");

    axum::serve(listener, routes::router(state)).await.context("server exited with an error")?;
    Ok(())
}
