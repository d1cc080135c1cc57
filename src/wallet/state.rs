//! Authorization state shared by every wallet entry point.
//!
//! Owner registry, quorum policy, pending ledger and daily limit live together
//! so a single clone captures everything a step may change. Notices are not
//! part of the state; mutators write them to a log the caller passes in.
//! `authorize` is the one quorum guard used by every gated entry point.

use super::daily_limit::DailyLimitState;
use super::notice::{Notice, NoticeLog};
use super::operation::ManagementCall;
use super::outcome::IgnoreReason;
use super::owners::{OwnerRegistry, OwnerSlot, MAX_OWNERS};
use super::pending::{PendingLedger, Revocation, Vote};
use super::quorum::QuorumPolicy;
use super::{WalletError, WalletResult};
use crate::identity::{AccountId, OperationId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationState {
    owners: OwnerRegistry,
    quorum: QuorumPolicy,
    pending: PendingLedger,
    daily: DailyLimitState,
}

impl AuthorizationState {
    /// Build the initial state. Malformed arguments are fatal.
    pub fn new(
        owners: &[AccountId],
        required: usize,
        daily_limit: u128,
        today: u64,
    ) -> WalletResult<Self> {
        if owners.is_empty() {
            return Err(WalletError::InvalidConfig(
                "at least one owner is required".to_string(),
            ));
        }
        if owners.len() > MAX_OWNERS {
            return Err(WalletError::InvalidConfig(format!(
                "{} owners exceeds the maximum of {}",
                owners.len(),
                MAX_OWNERS
            )));
        }
        let unique: HashSet<_> = owners.iter().collect();
        if unique.len() != owners.len() {
            return Err(WalletError::InvalidConfig(
                "owner list contains duplicates".to_string(),
            ));
        }
        let registry = OwnerRegistry::from_owners(owners).map_err(|reason| {
            WalletError::InvalidConfig(format!("owner list rejected: {}", reason.describe()))
        })?;
        let quorum = QuorumPolicy::new(required, registry.len()).map_err(|_| {
            WalletError::InvalidConfig(format!(
                "required confirmations {} must be between 1 and {}",
                required,
                registry.len()
            ))
        })?;

        Ok(Self {
            owners: registry,
            quorum,
            pending: PendingLedger::new(),
            daily: DailyLimitState::new(daily_limit, today),
        })
    }

    pub fn owners(&self) -> &OwnerRegistry {
        &self.owners
    }

    pub fn quorum(&self) -> &QuorumPolicy {
        &self.quorum
    }

    pub fn pending(&self) -> &PendingLedger {
        &self.pending
    }

    pub fn daily(&self) -> &DailyLimitState {
        &self.daily
    }

    pub fn is_owner(&self, id: &AccountId) -> bool {
        self.owners.contains(id)
    }

    pub fn has_confirmed(&self, operation: &OperationId, owner: &AccountId) -> bool {
        self.owners
            .slot_of(owner)
            .is_some_and(|slot| self.pending.has_confirmed(operation, slot))
    }

    fn caller_slot(&self, caller: &AccountId) -> Result<OwnerSlot, IgnoreReason> {
        self.owners.slot_of(caller).ok_or_else(|| {
            debug!(caller = %caller.short(), "ignored: caller is not an owner");
            IgnoreReason::NotOwner
        })
    }

    /// Quorum guard: count `caller`'s vote on `operation`.
    pub fn authorize(
        &mut self,
        caller: &AccountId,
        operation: OperationId,
        notices: &mut NoticeLog,
    ) -> Result<Vote, IgnoreReason> {
        let slot = self.caller_slot(caller)?;
        let vote = self
            .pending
            .confirm_and_check(operation, slot, self.quorum.required());
        match vote {
            Vote::Satisfied | Vote::Recorded { .. } => notices.record(Notice::Confirmation {
                owner: *caller,
                operation,
            }),
            Vote::Duplicate => {
                debug!(caller = %caller.short(), %operation, "duplicate confirmation");
            }
        }
        Ok(vote)
    }

    /// Withdraw `caller`'s vote. Returns the confirmations now needed.
    pub fn revoke(
        &mut self,
        caller: &AccountId,
        operation: &OperationId,
        notices: &mut NoticeLog,
    ) -> Result<usize, IgnoreReason> {
        let slot = self.caller_slot(caller)?;
        match self.pending.revoke(operation, slot) {
            Revocation::Revoked { remaining } => {
                notices.record(Notice::Revoke {
                    owner: *caller,
                    operation: *operation,
                });
                Ok(remaining)
            }
            Revocation::Unknown => Err(IgnoreReason::UnknownOperation),
            Revocation::NotVoted => Err(IgnoreReason::NotConfirmed),
        }
    }

    /// Owner-only allowance check; commits `amount` when it fits.
    pub fn under_limit(&mut self, caller: &AccountId, amount: u128, today: u64) -> bool {
        self.is_owner(caller) && self.daily.under_limit(amount, today)
    }

    /// Whether `call` would take effect right now.
    pub fn check(&self, call: &ManagementCall) -> Result<(), IgnoreReason> {
        match call {
            ManagementCall::AddOwner { owner } => self.owners.check_add(owner),
            ManagementCall::RemoveOwner { owner } => {
                self.owners.check_remove(owner, self.quorum.required())
            }
            ManagementCall::ChangeOwner { from, to } => self.owners.check_replace(from, to),
            ManagementCall::ChangeRequirement { required } => {
                QuorumPolicy::check(*required, self.owners.len())
            }
            ManagementCall::SetDailyLimit { .. } | ManagementCall::ResetSpentToday => Ok(()),
        }
    }

    /// Apply an authorized management call. Returns the pending operations it
    /// invalidated so the caller can drop their queued actions.
    pub fn apply(
        &mut self,
        call: ManagementCall,
        notices: &mut NoticeLog,
    ) -> Result<Vec<OperationId>, IgnoreReason> {
        self.check(&call)?;
        match call {
            ManagementCall::AddOwner { owner } => {
                self.owners.add(owner)?;
                let cleared = self.pending.clear_all();
                notices.record(Notice::OwnerAdded { new_owner: owner });
                Ok(cleared)
            }
            ManagementCall::RemoveOwner { owner } => {
                let cleared = self.pending.clear_all();
                self.owners.remove(&owner, self.quorum.required())?;
                notices.record(Notice::OwnerRemoved { old_owner: owner });
                Ok(cleared)
            }
            ManagementCall::ChangeOwner { from, to } => {
                let cleared = self.pending.clear_all();
                self.owners.replace(&from, to)?;
                notices.record(Notice::OwnerChanged {
                    old_owner: from,
                    new_owner: to,
                });
                Ok(cleared)
            }
            ManagementCall::ChangeRequirement { required } => {
                self.quorum.set(required, self.owners.len())?;
                let cleared = self.pending.clear_all();
                notices.record(Notice::RequirementChanged { required });
                Ok(cleared)
            }
            ManagementCall::SetDailyLimit { limit } => {
                self.daily.set_daily_limit(limit);
                notices.record(Notice::DailyLimitChanged { limit });
                Ok(Vec::new())
            }
            ManagementCall::ResetSpentToday => {
                self.daily.reset_spent_today();
                notices.record(Notice::SpentTodayReset);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(label: &str) -> AccountId {
        AccountId::from_label(label)
    }

    fn op(n: u8) -> OperationId {
        OperationId::from_bytes(&[n; 32])
    }

    fn three_owners(required: usize) -> AuthorizationState {
        AuthorizationState::new(&[id("a"), id("b"), id("c")], required, 100, 0).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_quorum() {
        let result = AuthorizationState::new(&[id("a")], 0, 0, 0);
        assert!(matches!(result, Err(WalletError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_rejects_quorum_above_owner_count() {
        let result = AuthorizationState::new(&[id("a"), id("b")], 3, 0, 0);
        assert!(matches!(result, Err(WalletError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_rejects_duplicates_and_empty() {
        assert!(AuthorizationState::new(&[id("a"), id("a")], 1, 0, 0).is_err());
        assert!(AuthorizationState::new(&[], 1, 0, 0).is_err());
    }

    #[test]
    fn test_authorize_rejects_non_owner() {
        let mut state = three_owners(2);
        let mut log = NoticeLog::new();
        assert_eq!(
            state.authorize(&id("mallory"), op(1), &mut log),
            Err(IgnoreReason::NotOwner)
        );
        assert!(state.pending().is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_authorize_records_confirmations() {
        let mut state = three_owners(2);
        let mut log = NoticeLog::new();
        assert_eq!(
            state.authorize(&id("a"), op(1), &mut log),
            Ok(Vote::Recorded { remaining: 1 })
        );
        assert!(state.has_confirmed(&op(1), &id("a")));
        assert!(!state.has_confirmed(&op(1), &id("b")));
        assert_eq!(state.authorize(&id("a"), op(1), &mut log), Ok(Vote::Duplicate));
        assert_eq!(state.authorize(&id("b"), op(1), &mut log), Ok(Vote::Satisfied));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_revoke_outcomes() {
        let mut state = three_owners(3);
        let mut log = NoticeLog::new();
        state.authorize(&id("a"), op(1), &mut log).unwrap();
        assert_eq!(
            state.revoke(&id("b"), &op(1), &mut log),
            Err(IgnoreReason::NotConfirmed)
        );
        assert_eq!(
            state.revoke(&id("a"), &op(2), &mut log),
            Err(IgnoreReason::UnknownOperation)
        );
        assert_eq!(
            state.revoke(&id("x"), &op(1), &mut log),
            Err(IgnoreReason::NotOwner)
        );
        assert_eq!(state.revoke(&id("a"), &op(1), &mut log), Ok(3));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_owner_changes_clear_pending() {
        let mut state = three_owners(2);
        let mut log = NoticeLog::new();
        state.authorize(&id("a"), op(1), &mut log).unwrap();
        state.authorize(&id("a"), op(2), &mut log).unwrap();

        let cleared = state
            .apply(ManagementCall::AddOwner { owner: id("d") }, &mut log)
            .unwrap();
        assert_eq!(cleared, vec![op(1), op(2)]);
        assert!(state.pending().is_empty());
        assert!(state.is_owner(&id("d")));
    }

    #[test]
    fn test_remove_owner_clears_before_slots_move() {
        let mut state = three_owners(2);
        let mut log = NoticeLog::new();
        state.authorize(&id("c"), op(1), &mut log).unwrap();

        let cleared = state
            .apply(ManagementCall::RemoveOwner { owner: id("a") }, &mut log)
            .unwrap();
        assert_eq!(cleared, vec![op(1)]);
        assert!(state.pending().is_empty());
        // c moved into a's slot and carries no vote from its old slot
        assert_eq!(state.owners().get(0), Some(id("c")));
        assert!(!state.has_confirmed(&op(1), &id("c")));
    }

    #[test]
    fn test_change_owner_preserves_slot() {
        let mut state = three_owners(2);
        let mut log = NoticeLog::new();
        state.authorize(&id("b"), op(1), &mut log).unwrap();
        let slot = state.owners().slot_of(&id("b"));
        let cleared = state
            .apply(
                ManagementCall::ChangeOwner {
                    from: id("b"),
                    to: id("z"),
                },
                &mut log,
            )
            .unwrap();
        assert_eq!(cleared, vec![op(1)]);
        assert_eq!(state.owners().slot_of(&id("z")), slot);
        assert!(!state.is_owner(&id("b")));
        assert!(!state.has_confirmed(&op(1), &id("z")));
    }

    #[test]
    fn test_remove_below_floor_ignored() {
        let mut state = AuthorizationState::new(&[id("a"), id("b")], 2, 0, 0).unwrap();
        let mut log = NoticeLog::new();
        state.authorize(&id("a"), op(1), &mut log).unwrap();
        assert_eq!(
            state.apply(ManagementCall::RemoveOwner { owner: id("b") }, &mut log),
            Err(IgnoreReason::BelowQuorumFloor)
        );
        // a no-op leaves pending votes alone
        assert!(state.pending().contains(&op(1)));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_change_requirement_bounds() {
        let mut state = three_owners(2);
        let mut log = NoticeLog::new();
        assert_eq!(
            state.apply(ManagementCall::ChangeRequirement { required: 0 }, &mut log),
            Err(IgnoreReason::InvalidRequirement)
        );
        assert_eq!(
            state.apply(ManagementCall::ChangeRequirement { required: 4 }, &mut log),
            Err(IgnoreReason::InvalidRequirement)
        );
        state
            .apply(ManagementCall::ChangeRequirement { required: 3 }, &mut log)
            .unwrap();
        assert_eq!(state.quorum().required(), 3);
        assert_eq!(
            log.take(),
            vec![Notice::RequirementChanged { required: 3 }]
        );
    }

    #[test]
    fn test_under_limit_owner_only() {
        let mut state = three_owners(2);
        assert!(!state.under_limit(&id("x"), 10, 0));
        assert_eq!(state.daily().spent_today(), 0);
        assert!(state.under_limit(&id("a"), 10, 0));
        assert_eq!(state.daily().spent_today(), 10);
    }

    #[test]
    fn test_daily_limit_calls_keep_pending() {
        let mut state = three_owners(2);
        let mut log = NoticeLog::new();
        state.authorize(&id("a"), op(1), &mut log).unwrap();
        state
            .apply(ManagementCall::SetDailyLimit { limit: 5 }, &mut log)
            .unwrap();
        state
            .apply(ManagementCall::ResetSpentToday, &mut log)
            .unwrap();
        assert!(state.pending().contains(&op(1)));
        assert_eq!(state.daily().daily_limit(), 5);
    }
}
