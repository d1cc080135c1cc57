//! Covenant - Shared-Custody Wallet Gateway
//!
//! Authorization and execution gateway for an account controlled jointly by
//! a set of owners.
//!
//! Key principles:
//! - Small plain transfers pass on one owner's authority within a daily allowance
//! - Everything else needs M-of-N owner confirmations
//! - Each operation executes at most once, on the M-th distinct confirmation
//! - Any owner or quorum change invalidates every open vote
//! - Each public call is all-or-nothing

pub mod identity;
pub mod serialization;
pub mod wallet;

pub use identity::{AccountId, OperationId};
pub use wallet::{Action, Outcome, Wallet, WalletError, WalletResult};
