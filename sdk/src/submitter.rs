//! Transaction submission

use crate::{
    bootstrap::Session,
    connection::LedgerConnection,
    error::{ElectionClientError, Rejection, Result},
    instruction::{create_election_accounts, ElectionCreationRecord, ElectionInstruction},
    state::Election,
};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use tracing::{debug, info};

/// Wrap a single instruction in an unsigned transaction paid for by
/// `fee_payer`
pub fn assemble_transaction(
    program_id: Pubkey,
    accounts: Vec<AccountMeta>,
    payload: Vec<u8>,
    fee_payer: &Pubkey,
) -> Transaction {
    let instruction = Instruction {
        program_id,
        accounts,
        data: payload,
    };
    Transaction::new_with_payer(&[instruction], Some(fee_payer))
}

/// Build, sign, send and confirm one instruction.
///
/// The first signer pays the fee. Every account flagged as a signer must
/// have a matching key-pair in `signers`.
pub async fn submit<C: LedgerConnection + ?Sized>(
    connection: &C,
    program_id: Pubkey,
    accounts: Vec<AccountMeta>,
    payload: Vec<u8>,
    signers: &[&Keypair],
) -> Result<Signature> {
    let fee_payer = signers.first().ok_or(Rejection::NoSigners)?.pubkey();
    let mut transaction = assemble_transaction(program_id, accounts, payload, &fee_payer);

    let recent_blockhash = connection
        .latest_blockhash()
        .await
        .map_err(|e| ElectionClientError::Blockhash(Box::new(e)))?;
    debug!("Using blockhash {}", recent_blockhash);

    transaction
        .try_sign(signers, recent_blockhash)
        .map_err(Rejection::from)?;

    let signature = connection
        .send_transaction(&transaction)
        .await
        .map_err(|e| Rejection::Send(Box::new(e)))?;
    info!("Sent transaction {}", signature);

    connection
        .confirm_signature(&signature)
        .await
        .map_err(|e| ElectionClientError::Confirmation {
            signature,
            source: Box::new(e),
        })?;

    Ok(signature)
}

/// Submit a create-election instruction for `session`'s election account
pub async fn submit_create_election<C: LedgerConnection>(
    session: &Session<C>,
    program_id: Pubkey,
    record: ElectionCreationRecord,
) -> Result<Signature> {
    info!(
        "Creating election {:?} with {} candidates at {}",
        record.name,
        record.candidates.len(),
        session.election_pubkey()
    );
    let payload = ElectionInstruction::CreateElection(record).pack()?;
    let accounts = create_election_accounts(session.election_pubkey(), session.payer_pubkey());

    submit(
        session.connection(),
        program_id,
        accounts,
        payload,
        &[session.payer(), session.election_account()],
    )
    .await
}

/// Read and decode an election account
pub async fn fetch_election<C: LedgerConnection + ?Sized>(
    connection: &C,
    account: &Pubkey,
) -> Result<Election> {
    let data = connection
        .account_data(account)
        .await
        .map_err(|e| ElectionClientError::AccountFetch {
            account: *account,
            source: Box::new(e),
        })?;
    Election::unpack(&data).map_err(|source| ElectionClientError::Decoding {
        account: *account,
        source,
    })
}
