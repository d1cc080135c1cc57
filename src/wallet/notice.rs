//! Observable notices emitted by the wallet.
//!
//! Every notice is logged through `tracing` when recorded and kept in order
//! until the host drains it. Notices recorded during a step that aborts are
//! rolled back with the rest of the state.

use super::operation::Recipient;
use crate::identity::{AccountId, OperationId};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// An owner's vote was counted.
    Confirmation {
        owner: AccountId,
        operation: OperationId,
    },
    /// An owner withdrew a vote.
    Revoke {
        owner: AccountId,
        operation: OperationId,
    },
    OwnerChanged {
        old_owner: AccountId,
        new_owner: AccountId,
    },
    OwnerAdded {
        new_owner: AccountId,
    },
    OwnerRemoved {
        old_owner: AccountId,
    },
    RequirementChanged {
        required: usize,
    },
    DailyLimitChanged {
        limit: u128,
    },
    SpentTodayReset,
    /// Value arrived in the wallet.
    Deposit {
        from: AccountId,
        amount: u128,
    },
    /// A deferred action is waiting on more owners.
    ConfirmationNeeded {
        operation: OperationId,
        initiator: AccountId,
        amount: u128,
        recipient: Recipient,
        payload: Vec<u8>,
    },
    /// An action ran on one owner's authority.
    SingleTransact {
        owner: AccountId,
        amount: u128,
        recipient: Recipient,
        payload: Vec<u8>,
        created: Option<AccountId>,
    },
    /// An action ran after reaching quorum.
    MultiTransact {
        owner: AccountId,
        operation: OperationId,
        amount: u128,
        recipient: Recipient,
        payload: Vec<u8>,
        created: Option<AccountId>,
    },
}

/// Ordered buffer of notices not yet taken by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeLog {
    entries: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, notice: Notice) {
        log_notice(&notice);
        self.entries.push(notice);
    }

    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.entries)
    }

    /// Drop notices recorded after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn as_slice(&self) -> &[Notice] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn log_notice(notice: &Notice) {
    match notice {
        Notice::Confirmation { owner, operation } => {
            info!(owner = %owner.short(), %operation, "confirmation recorded");
        }
        Notice::Revoke { owner, operation } => {
            info!(owner = %owner.short(), %operation, "confirmation revoked");
        }
        Notice::OwnerChanged {
            old_owner,
            new_owner,
        } => {
            info!(old = %old_owner.short(), new = %new_owner.short(), "owner changed");
        }
        Notice::OwnerAdded { new_owner } => info!(owner = %new_owner.short(), "owner added"),
        Notice::OwnerRemoved { old_owner } => info!(owner = %old_owner.short(), "owner removed"),
        Notice::RequirementChanged { required } => info!(required, "quorum changed"),
        Notice::DailyLimitChanged { limit } => info!(%limit, "daily limit changed"),
        Notice::SpentTodayReset => info!("spent today reset"),
        Notice::Deposit { from, amount } => info!(from = %from.short(), %amount, "deposit"),
        Notice::ConfirmationNeeded {
            operation,
            initiator,
            amount,
            recipient,
            ..
        } => {
            info!(
                %operation,
                initiator = %initiator.short(),
                %amount,
                %recipient,
                "confirmation needed"
            );
        }
        Notice::SingleTransact {
            owner,
            amount,
            recipient,
            created,
            ..
        } => {
            info!(
                owner = %owner.short(),
                %amount,
                %recipient,
                created = ?created.map(|c| c.short()),
                "executed on single owner"
            );
        }
        Notice::MultiTransact {
            owner,
            operation,
            amount,
            recipient,
            created,
            ..
        } => {
            info!(
                owner = %owner.short(),
                %operation,
                %amount,
                %recipient,
                created = ?created.map(|c| c.short()),
                "executed after quorum"
            );
        }
    }
}
