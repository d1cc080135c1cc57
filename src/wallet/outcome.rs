//! Results of wallet entry points.
//!
//! Policy violations are not errors: the call completes, changes nothing and
//! reports why through [`Outcome::Ignored`]. Only fatal conditions surface as
//! [`super::WalletError`].

use crate::identity::{AccountId, OperationId};
use serde::{Deserialize, Serialize};

/// Why a request left the wallet untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Caller is not an owner.
    NotOwner,
    /// Caller already voted on this operation.
    AlreadyConfirmed,
    /// No queued transaction or open vote carries this identifier.
    UnknownOperation,
    /// Caller has no vote on this operation to revoke.
    NotConfirmed,
    /// Target identity is already an owner.
    AlreadyOwner,
    /// Target identity is not an owner.
    NotAnOwner,
    /// Removal would leave fewer owners than the quorum requires.
    BelowQuorumFloor,
    /// Every owner slot is taken.
    RegistryFull,
    /// Requested quorum is zero or exceeds the owner count.
    InvalidRequirement,
    /// Deposit of nothing.
    ZeroAmount,
}

impl IgnoreReason {
    /// Short description for operator output.
    pub fn describe(&self) -> &'static str {
        match self {
            IgnoreReason::NotOwner => "caller is not an owner",
            IgnoreReason::AlreadyConfirmed => "caller already confirmed this operation",
            IgnoreReason::UnknownOperation => "unknown operation",
            IgnoreReason::NotConfirmed => "caller has not confirmed this operation",
            IgnoreReason::AlreadyOwner => "identity is already an owner",
            IgnoreReason::NotAnOwner => "identity is not an owner",
            IgnoreReason::BelowQuorumFloor => "removal would drop owners below the quorum",
            IgnoreReason::RegistryFull => "owner registry is full",
            IgnoreReason::InvalidRequirement => "quorum must be between 1 and the owner count",
            IgnoreReason::ZeroAmount => "amount is zero",
        }
    }
}

/// Record of an action the executor performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// Operation that reached quorum, or `OperationId::ZERO` for the single-owner path.
    pub operation: OperationId,
    /// Account created by the action, when the recipient was the create marker.
    pub created: Option<AccountId>,
}

/// What an entry point did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The action ran through the executor.
    Executed(Execution),
    /// A quorum-gated management change took effect.
    Applied,
    /// The caller's vote was recorded; more confirmations are needed.
    Pending(OperationId),
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl Outcome {
    /// Identifier other owners should confirm. Zero when nothing is left to confirm.
    pub fn operation_id(&self) -> OperationId {
        match self {
            Outcome::Pending(op) => *op,
            _ => OperationId::ZERO,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending(_))
    }

    pub fn is_executed(&self) -> bool {
        matches!(self, Outcome::Executed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_id_zero_unless_pending() {
        let op = OperationId::from_bytes(&[3u8; 32]);
        assert_eq!(Outcome::Pending(op).operation_id(), op);
        assert!(Outcome::Applied.operation_id().is_zero());
        assert!(Outcome::Ignored(IgnoreReason::NotOwner)
            .operation_id()
            .is_zero());
        let executed = Outcome::Executed(Execution {
            operation: op,
            created: None,
        });
        assert!(executed.operation_id().is_zero());
    }
}
