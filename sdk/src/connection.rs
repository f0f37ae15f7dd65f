//! Ledger connection seam
//!
//! Everything the client needs from the RPC service goes through
//! [`LedgerConnection`], so the bootstrap and submission flows can run
//! against a test double.

use crate::config::ElectionConfig;
use async_trait::async_trait;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// How long [`RpcConnection`] waits for a signature to reach its commitment
pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

pub const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[async_trait]
pub trait LedgerConnection: Send + Sync {
    /// Request test funds for `recipient`
    async fn request_airdrop(&self, recipient: &Pubkey, lamports: u64) -> ClientResult<Signature>;

    /// Wait until `signature` reaches the connection's commitment level.
    /// A transaction that landed with an error is a failure.
    async fn confirm_signature(&self, signature: &Signature) -> ClientResult<()>;

    async fn latest_blockhash(&self) -> ClientResult<Hash>;

    /// Transmit a signed transaction without waiting for it to land
    async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature>;

    async fn account_data(&self, account: &Pubkey) -> ClientResult<Vec<u8>>;
}

#[async_trait]
impl<'a, T: LedgerConnection + ?Sized> LedgerConnection for &'a T {
    async fn request_airdrop(&self, recipient: &Pubkey, lamports: u64) -> ClientResult<Signature> {
        (**self).request_airdrop(recipient, lamports).await
    }

    async fn confirm_signature(&self, signature: &Signature) -> ClientResult<()> {
        (**self).confirm_signature(signature).await
    }

    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        (**self).latest_blockhash().await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature> {
        (**self).send_transaction(transaction).await
    }

    async fn account_data(&self, account: &Pubkey) -> ClientResult<Vec<u8>> {
        (**self).account_data(account).await
    }
}

/// JSON-RPC backed connection
pub struct RpcConnection {
    rpc: RpcClient,
    confirm_timeout: Duration,
    poll_interval: Duration,
}

impl RpcConnection {
    pub fn new(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        Self::from_client(RpcClient::new_with_commitment(rpc_url.to_string(), commitment))
    }

    pub fn from_client(rpc: RpcClient) -> Self {
        Self {
            rpc,
            confirm_timeout: CONFIRM_TIMEOUT,
            poll_interval: CONFIRM_POLL_INTERVAL,
        }
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.confirm_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn from_config(config: &ElectionConfig) -> Self {
        Self::new(&config.rpc_url, config.commitment)
    }

    pub fn url(&self) -> String {
        self.rpc.url()
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.rpc.commitment()
    }
}

#[async_trait]
impl LedgerConnection for RpcConnection {
    async fn request_airdrop(&self, recipient: &Pubkey, lamports: u64) -> ClientResult<Signature> {
        debug!("requestAirdrop {} lamports -> {}", lamports, recipient);
        self.rpc.request_airdrop(recipient, lamports).await
    }

    async fn confirm_signature(&self, signature: &Signature) -> ClientResult<()> {
        let commitment = self.rpc.commitment();
        debug!("Polling for {} at {:?}", signature, commitment.commitment);
        let deadline = Instant::now() + self.confirm_timeout;

        loop {
            match self
                .rpc
                .get_signature_status_with_commitment(signature, commitment)
                .await?
            {
                Some(Ok(())) => return Ok(()),
                Some(Err(e)) => {
                    warn!("Transaction {} failed: {}", signature, e);
                    return Err(ClientErrorKind::TransactionError(e).into());
                }
                None if Instant::now() >= deadline => {
                    return Err(ClientErrorKind::Custom(format!(
                        "signature {signature} not confirmed within {:?}",
                        self.confirm_timeout
                    ))
                    .into());
                }
                None => sleep(self.poll_interval).await,
            }
        }
    }

    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        self.rpc.get_latest_blockhash().await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature> {
        self.rpc.send_transaction(transaction).await
    }

    async fn account_data(&self, account: &Pubkey) -> ClientResult<Vec<u8>> {
        self.rpc.get_account_data(account).await
    }
}
