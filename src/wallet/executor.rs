//! External executor seam.
//!
//! The executor performs an approved action. It either succeeds, optionally
//! returning the account it created, or fails; a failure aborts the whole
//! wallet step. Implementations live outside the wallet core; see
//! `wallet::mock` for the test double.

use super::operation::Action;
use crate::identity::AccountId;
use async_trait::async_trait;

/// Result type for executor operations.
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Executor failures. Any of these rolls back the enclosing step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    #[error("Action rejected: {0}")]
    Rejected(String),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u128, available: u128 },

    #[error("Executor error: {0}")]
    Other(String),
}

/// Performs transfers, calls and account creation on the wallet's behalf.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Perform `action`. Returns the created account for `Recipient::Create`.
    async fn execute(&self, action: &Action) -> ExecutorResult<Option<AccountId>>;
}
