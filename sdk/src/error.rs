//! Failure categories of a create-election run

use crate::schema::{DecodeError, EncodeError};
use solana_client::client_error::ClientError;
use solana_sdk::{pubkey::Pubkey, signature::Signature, signer::SignerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElectionClientError {
    #[error("Airdrop of {lamports} lamports to {recipient} failed: {source}")]
    Funding {
        recipient: Pubkey,
        lamports: u64,
        #[source]
        source: Box<ClientError>,
    },

    #[error("Failed to fetch latest blockhash: {0}")]
    Blockhash(#[source] Box<ClientError>),

    #[error("Failed to encode instruction data: {0}")]
    Encoding(#[from] EncodeError),

    #[error("Transaction rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("Confirmation of {signature} failed: {source}")]
    Confirmation {
        signature: Signature,
        #[source]
        source: Box<ClientError>,
    },

    #[error("Failed to read account {account}: {source}")]
    AccountFetch {
        account: Pubkey,
        #[source]
        source: Box<ClientError>,
    },

    #[error("Failed to decode account {account}: {source}")]
    Decoding {
        account: Pubkey,
        #[source]
        source: DecodeError,
    },
}

/// Why a transaction never made it onto the ledger
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("no signers supplied")]
    NoSigners,

    #[error("signing failed: {0}")]
    Signing(#[from] SignerError),

    #[error("{0}")]
    Send(Box<ClientError>),
}

pub type Result<T> = std::result::Result<T, ElectionClientError>;
