//! Client configuration

use solana_sdk::{commitment_config::CommitmentConfig, native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};

/// Address of the deployed election program
pub const ELECTION_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("5Nm79rArgFbmkbTP3aCVSJS65azFwbtjpkDqt49Pa9Ac");

pub const DEFAULT_RPC_URL: &str = "http://localhost:8899";

/// One SOL
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = LAMPORTS_PER_SOL;

#[derive(Debug, Clone)]
pub struct ElectionConfig {
    /// RPC endpoint URL
    pub rpc_url: String,

    /// Commitment level awaited for airdrops and submitted transactions
    pub commitment: CommitmentConfig,

    /// Target election program
    pub program_id: Pubkey,

    /// Lamports requested for the payer before submitting
    pub airdrop_lamports: u64,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: CommitmentConfig::confirmed(),
            program_id: ELECTION_PROGRAM_ID,
            airdrop_lamports: DEFAULT_AIRDROP_LAMPORTS,
        }
    }
}
