//! feldera-mock: serve the in-memory program API.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use feldera_mock::{router, MockState};

#[derive(Parser)]
#[command(name = "feldera-mock")]
#[command(about = "In-memory mock of the Feldera program API")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "feldera_mock=info".into()),
        )
        .init();

    let args = Args::parse();
    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("Failed to bind {}", args.listen))?;
    info!("Mock Feldera API listening on http://{}/v0", args.listen);

    axum::serve(listener, router(MockState::new()))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Server error")?;

    Ok(())
}
