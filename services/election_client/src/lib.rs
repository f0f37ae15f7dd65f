//! Election client
//!
//! Funds a fresh payer on a test network and submits one create-election
//! transaction, waiting for it to be confirmed.

pub mod config;

pub use config::Config;

use election_sdk::{submit_create_election, LedgerConnection, RpcConnection, Session};
use solana_sdk::signature::Signature;
use tracing::info;

/// Run against the RPC endpoint named in `config`
pub async fn run(config: Config) -> election_sdk::Result<Signature> {
    info!("Connecting to {} ({:?})", config.election.rpc_url, config.election.commitment.commitment);
    let connection = RpcConnection::from_config(&config.election);
    run_with(connection, &config).await
}

/// Bootstrap a session on `connection` and submit the configured election
pub async fn run_with<C: LedgerConnection>(
    connection: C,
    config: &Config,
) -> election_sdk::Result<Signature> {
    let session = Session::bootstrap(connection, &config.election).await?;

    let signature =
        submit_create_election(&session, config.election.program_id, config.record()).await?;

    info!(
        "Election account {} created by payer {}",
        session.election_pubkey(),
        session.payer_pubkey()
    );
    Ok(signature)
}
