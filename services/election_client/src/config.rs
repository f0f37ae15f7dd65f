//! Client configuration

use anyhow::{Context, Result};
use election_sdk::{config::DEFAULT_RPC_URL, ElectionConfig, ElectionCreationRecord};
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};

pub const DEFAULT_ELECTION_NAME: &str = "Test Election";
pub const DEFAULT_CANDIDATES: &str = "Alice,Bob";

#[derive(Clone, Debug)]
pub struct Config {
    /// Connection, program and funding settings
    pub election: ElectionConfig,

    /// Name of the election to create
    pub election_name: String,

    /// Candidates in ballot order
    pub candidates: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            election: ElectionConfig::default(),
            election_name: DEFAULT_ELECTION_NAME.to_string(),
            candidates: parse_candidates(DEFAULT_CANDIDATES),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ElectionConfig::default();

        let commitment = match lookup("COMMITMENT") {
            Some(level) => CommitmentConfig {
                commitment: level
                    .parse::<CommitmentLevel>()
                    .with_context(|| format!("Invalid COMMITMENT {level:?}"))?,
            },
            None => defaults.commitment,
        };

        let program_id = match lookup("PROGRAM_ID") {
            Some(id) => id.parse().context("Invalid PROGRAM_ID")?,
            None => defaults.program_id,
        };

        let airdrop_lamports = match lookup("AIRDROP_LAMPORTS") {
            Some(lamports) => lamports.parse().context("Invalid AIRDROP_LAMPORTS")?,
            None => defaults.airdrop_lamports,
        };

        Ok(Config {
            election: ElectionConfig {
                rpc_url: lookup("RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
                commitment,
                program_id,
                airdrop_lamports,
            },

            election_name: lookup("ELECTION_NAME")
                .unwrap_or_else(|| DEFAULT_ELECTION_NAME.to_string()),

            candidates: parse_candidates(
                &lookup("ELECTION_CANDIDATES").unwrap_or_else(|| DEFAULT_CANDIDATES.to_string()),
            ),
        })
    }

    pub fn record(&self) -> ElectionCreationRecord {
        ElectionCreationRecord::new(self.election_name.clone(), self.candidates.iter().cloned())
    }
}

/// Comma separated, surrounding whitespace trimmed, blank entries dropped
fn parse_candidates(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .map(ToString::to_string)
        .collect()
}
