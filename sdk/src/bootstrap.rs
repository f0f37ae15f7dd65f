//! Session bootstrap: a funded payer and a fresh election account

use crate::{
    config::ElectionConfig,
    connection::LedgerConnection,
    error::{ElectionClientError, Result},
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use tracing::info;

/// Identities and connection for one run
pub struct Session<C> {
    connection: C,
    payer: Keypair,
    election_account: Keypair,
    airdrop_signature: Signature,
}

impl<C: LedgerConnection> Session<C> {
    /// Generate both key-pairs, fund the payer and wait for the airdrop to
    /// reach the connection's commitment level
    pub async fn bootstrap(connection: C, config: &ElectionConfig) -> Result<Self> {
        Self::bootstrap_with(connection, config, Keypair::new(), Keypair::new()).await
    }

    /// Like [`Session::bootstrap`] with caller-supplied identities
    pub async fn bootstrap_with(
        connection: C,
        config: &ElectionConfig,
        payer: Keypair,
        election_account: Keypair,
    ) -> Result<Self> {
        let recipient = payer.pubkey();
        let lamports = config.airdrop_lamports;
        let funding_error = |source| ElectionClientError::Funding {
            recipient,
            lamports,
            source: Box::new(source),
        };

        info!("Requesting airdrop of {} lamports for payer {}", lamports, recipient);
        let airdrop_signature = connection
            .request_airdrop(&recipient, lamports)
            .await
            .map_err(funding_error)?;

        connection
            .confirm_signature(&airdrop_signature)
            .await
            .map_err(funding_error)?;
        info!("Airdrop {} confirmed", airdrop_signature);

        Ok(Self {
            connection,
            payer,
            election_account,
            airdrop_signature,
        })
    }
}

impl<C> Session<C> {
    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn payer(&self) -> &Keypair {
        &self.payer
    }

    pub fn election_account(&self) -> &Keypair {
        &self.election_account
    }

    pub fn payer_pubkey(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn election_pubkey(&self) -> Pubkey {
        self.election_account.pubkey()
    }

    pub fn airdrop_signature(&self) -> &Signature {
        &self.airdrop_signature
    }
}
