//! Proposed actions and their operation identifiers.
//!
//! An identifier is SHA-256 over a domain tag and the canonical CBOR encoding
//! of the request. For actions the encoding includes a caller-supplied nonce:
//! identical parameters with the same nonce always produce the same id (so
//! owners vote on one item), and a different nonce always produces a
//! different id.

use crate::identity::{AccountId, OperationId};
use crate::serialization::{hash_cbor, SerializationError};
use serde::{Deserialize, Serialize};
use std::fmt;

const ACTION_DOMAIN: &[u8] = b"covenant-action-v1";
const MANAGEMENT_DOMAIN: &[u8] = b"covenant-management-v1";

/// Where an action sends value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    /// An existing account.
    Account(AccountId),
    /// Create a new account, using the payload as its initialization code.
    Create,
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Account(id) => write!(f, "{}", id),
            Recipient::Create => write!(f, "<create>"),
        }
    }
}

/// An outgoing action: transfer, call, or account creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub recipient: Recipient,
    pub amount: u128,
    pub payload: Vec<u8>,
}

#[derive(Serialize)]
struct ActionPreimage<'a> {
    action: &'a Action,
    nonce: u64,
}

impl Action {
    /// Plain value transfer.
    pub fn transfer(to: AccountId, amount: u128) -> Self {
        Self {
            recipient: Recipient::Account(to),
            amount,
            payload: Vec::new(),
        }
    }

    /// Call with a payload.
    pub fn call(to: AccountId, amount: u128, payload: Vec<u8>) -> Self {
        Self {
            recipient: Recipient::Account(to),
            amount,
            payload,
        }
    }

    /// New-account creation with initialization code.
    pub fn create(amount: u128, code: Vec<u8>) -> Self {
        Self {
            recipient: Recipient::Create,
            amount,
            payload: code,
        }
    }

    /// No payload: eligible for the daily allowance.
    pub fn is_plain(&self) -> bool {
        self.payload.is_empty()
    }

    /// Identifier for voting on this action under `nonce`.
    pub fn operation_id(&self, nonce: u64) -> Result<OperationId, SerializationError> {
        let digest = hash_cbor(
            ACTION_DOMAIN,
            &ActionPreimage {
                action: self,
                nonce,
            },
        )?;
        Ok(OperationId::from_bytes(&digest))
    }
}

/// Quorum-gated changes to the wallet's own policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagementCall {
    AddOwner { owner: AccountId },
    RemoveOwner { owner: AccountId },
    ChangeOwner { from: AccountId, to: AccountId },
    ChangeRequirement { required: usize },
    SetDailyLimit { limit: u128 },
    ResetSpentToday,
}

impl ManagementCall {
    pub fn name(&self) -> &'static str {
        match self {
            ManagementCall::AddOwner { .. } => "add_owner",
            ManagementCall::RemoveOwner { .. } => "remove_owner",
            ManagementCall::ChangeOwner { .. } => "change_owner",
            ManagementCall::ChangeRequirement { .. } => "change_requirement",
            ManagementCall::SetDailyLimit { .. } => "set_daily_limit",
            ManagementCall::ResetSpentToday => "reset_spent_today",
        }
    }

    /// Identifier for voting on this call. Repeating the same call collides.
    pub fn operation_id(&self) -> Result<OperationId, SerializationError> {
        let digest = hash_cbor(MANAGEMENT_DOMAIN, self)?;
        Ok(OperationId::from_bytes(&digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bob() -> AccountId {
        AccountId::from_label("bob")
    }

    #[test]
    fn test_same_nonce_collides() {
        let a = Action::transfer(bob(), 80);
        let b = Action::transfer(bob(), 80);
        assert_eq!(a.operation_id(1).unwrap(), b.operation_id(1).unwrap());
    }

    #[test]
    fn test_different_nonce_differs() {
        let a = Action::transfer(bob(), 80);
        assert_ne!(a.operation_id(1).unwrap(), a.operation_id(2).unwrap());
    }

    #[test]
    fn test_each_field_changes_id() {
        let base = Action::call(bob(), 10, vec![1, 2]);
        let id = base.operation_id(0).unwrap();

        let other_amount = Action::call(bob(), 11, vec![1, 2]);
        let other_payload = Action::call(bob(), 10, vec![1, 3]);
        let other_recipient = Action::call(AccountId::from_label("eve"), 10, vec![1, 2]);
        let create = Action::create(10, vec![1, 2]);

        for other in [other_amount, other_payload, other_recipient, create] {
            assert_ne!(other.operation_id(0).unwrap(), id);
        }
    }

    #[test]
    fn test_never_zero() {
        let id = Action::transfer(bob(), 0).operation_id(0).unwrap();
        assert!(!id.is_zero());
    }

    #[test]
    fn test_management_ids_distinct_from_actions() {
        let mgmt = ManagementCall::SetDailyLimit { limit: 5 };
        assert_eq!(mgmt.operation_id().unwrap(), mgmt.operation_id().unwrap());
        assert_ne!(
            mgmt.operation_id().unwrap(),
            ManagementCall::SetDailyLimit { limit: 6 }.operation_id().unwrap()
        );
        assert_ne!(
            ManagementCall::AddOwner { owner: bob() }.operation_id().unwrap(),
            ManagementCall::RemoveOwner { owner: bob() }.operation_id().unwrap()
        );
    }

    #[test]
    fn test_is_plain() {
        assert!(Action::transfer(bob(), 1).is_plain());
        assert!(!Action::call(bob(), 1, vec![0]).is_plain());
    }

    #[test]
    fn test_recipient_display() {
        assert_eq!(Recipient::Create.to_string(), "<create>");
        assert_eq!(Recipient::Account(bob()).to_string(), bob().to_string());
    }
}
