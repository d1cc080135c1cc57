//! Simulation executor for the operator CLI.
//!
//! Logs each approved action instead of moving real value. Created accounts
//! get an id derived from the amount and creation code.

use async_trait::async_trait;
use covenant::wallet::{Executor, ExecutorResult, Recipient};
use covenant::{AccountId, Action};
use sha2::{Digest, Sha256};
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedExecutor;

#[async_trait]
impl Executor for SimulatedExecutor {
    async fn execute(&self, action: &Action) -> ExecutorResult<Option<AccountId>> {
        let created = match action.recipient {
            Recipient::Create => {
                let mut hasher = Sha256::new();
                hasher.update(b"covenant-simulated-create");
                hasher.update(action.amount.to_be_bytes());
                hasher.update(&action.payload);
                Some(AccountId::from_bytes(&hasher.finalize()))
            }
            Recipient::Account(_) => None,
        };

        info!(
            recipient = %action.recipient,
            amount = %action.amount,
            payload_len = action.payload.len(),
            created = ?created.map(|c| c.to_string()),
            "simulated execution"
        );
        Ok(created)
    }
}
