//! Election client binary

use anyhow::Result;
use election_client::{run, Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the confirmation line
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    info!("Election client configuration:");
    info!("  RPC URL: {}", config.election.rpc_url);
    info!("  Program: {}", config.election.program_id);
    info!("  Airdrop: {} lamports", config.election.airdrop_lamports);
    info!("  Election: {:?} {:?}", config.election_name, config.candidates);

    let signature = run(config).await?;

    println!("Transaction confirmed with signature: {signature}");
    Ok(())
}
