//! Shared-custody wallet core.
//!
//! A set of owners jointly controls outgoing actions. Small plain transfers
//! pass on one owner's authority while they fit the daily allowance; anything
//! else waits until a quorum of distinct owners has confirmed it.
//!
//! Every public entry point on [`Wallet`] is one atomic step: it commits all
//! of its changes or, on a fatal error, none of them.

pub mod daily_limit;
pub mod dispatcher;
pub mod executor;
pub mod mock;
pub mod notice;
pub mod operation;
pub mod outcome;
pub mod owners;
pub mod pending;
pub mod queue;
pub mod quorum;
pub mod state;

pub use daily_limit::{DayClock, SystemDayClock};
pub use dispatcher::{Wallet, WalletSnapshot};
pub use executor::{Executor, ExecutorError, ExecutorResult};
pub use notice::Notice;
pub use operation::{Action, ManagementCall, Recipient};
pub use outcome::{Execution, IgnoreReason, Outcome};
pub use owners::MAX_OWNERS;

use crate::serialization::SerializationError;

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Fatal wallet errors. A step that returns one of these has changed nothing.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("Invalid wallet configuration: {0}")]
    InvalidConfig(String),

    #[error("Execution failed: {0}")]
    Execution(#[from] ExecutorError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
}
