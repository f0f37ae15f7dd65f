//! Full client flow against a stub ledger

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use election_client::{run_with, Config};
    use election_sdk::connection::ClientResult;
    use election_sdk::{ElectionClientError, ElectionInstruction, LedgerConnection};
    use solana_client::client_error::{ClientError, ClientErrorKind};
    use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubLedger {
        deny_airdrop: bool,
        sent: Mutex<Vec<Transaction>>,
    }

    #[async_trait]
    impl LedgerConnection for StubLedger {
        async fn request_airdrop(&self, _recipient: &Pubkey, _lamports: u64) -> ClientResult<Signature> {
            if self.deny_airdrop {
                return Err(ClientError::from(ClientErrorKind::Custom(
                    "airdrop request limit reached".to_string(),
                )));
            }
            Ok(Signature::new_unique())
        }

        async fn confirm_signature(&self, _signature: &Signature) -> ClientResult<()> {
            Ok(())
        }

        async fn latest_blockhash(&self) -> ClientResult<Hash> {
            Ok(Hash::new_unique())
        }

        async fn send_transaction(&self, transaction: &Transaction) -> ClientResult<Signature> {
            self.sent.lock().unwrap().push(transaction.clone());
            Ok(transaction.signatures[0])
        }

        async fn account_data(&self, _account: &Pubkey) -> ClientResult<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_run_submits_configured_election() {
        let ledger = StubLedger::default();
        let config = Config {
            election_name: "Council".to_string(),
            candidates: vec!["Ada".to_string(), "Grace".to_string()],
            ..Config::default()
        };

        let signature = run_with(&ledger, &config).await.unwrap();

        let sent = ledger.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].signatures[0], signature);
        let message = &sent[0].message;
        let instruction = &message.instructions[0];
        assert_eq!(
            message.account_keys[usize::from(instruction.program_id_index)],
            config.election.program_id
        );
        assert_eq!(
            ElectionInstruction::unpack(&instruction.data).unwrap(),
            ElectionInstruction::CreateElection(config.record())
        );
    }

    #[tokio::test]
    async fn test_run_aborts_when_airdrop_denied() {
        let ledger = StubLedger {
            deny_airdrop: true,
            ..StubLedger::default()
        };

        let result = run_with(&ledger, &Config::default()).await;

        assert!(matches!(result, Err(ElectionClientError::Funding { .. })));
        assert!(ledger.sent.lock().unwrap().is_empty());
    }
}
