//! Wallet entry points.
//!
//! `execute` decides between the immediate path (plain transfer within the
//! daily allowance, or a quorum of one) and the deferred path (queue the
//! action and vote on it). `confirm` lets later owners vote on a queued
//! action. Management calls vote through the same ledger.
//!
//! Each entry point checkpoints state and queue first and restores them if
//! the step fails; notices recorded by the failed step are dropped. Notices
//! are held by the wallet, not the snapshot, until the host takes them.
//! Ledger and queue entries for an action are removed before the executor
//! runs, so anything the executor triggers sees the operation as
//! no longer pending.

use super::daily_limit::{DayClock, SystemDayClock};
use super::executor::Executor;
use super::notice::{Notice, NoticeLog};
use super::operation::{Action, ManagementCall};
use super::outcome::{Execution, IgnoreReason, Outcome};
use super::pending::Vote;
use super::queue::TransactionQueue;
use super::state::AuthorizationState;
use super::WalletResult;
use crate::identity::{AccountId, OperationId};
use crate::serialization::{from_cbor, to_cbor};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Everything a wallet needs to resume: authorization state and queued actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub state: AuthorizationState,
    pub queue: TransactionQueue,
}

impl WalletSnapshot {
    pub fn to_bytes(&self) -> WalletResult<Vec<u8>> {
        Ok(to_cbor(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        Ok(from_cbor(bytes)?)
    }
}

pub struct Wallet<E: Executor, C: DayClock = SystemDayClock> {
    state: AuthorizationState,
    queue: TransactionQueue,
    notices: NoticeLog,
    executor: E,
    clock: C,
}

impl<E: Executor, C: DayClock> Wallet<E, C> {
    /// Create a wallet. Fails on an empty or duplicated owner list, or a
    /// quorum outside `1..=owners.len()`.
    pub fn new(
        owners: &[AccountId],
        required: usize,
        daily_limit: u128,
        executor: E,
        clock: C,
    ) -> WalletResult<Self> {
        let state = AuthorizationState::new(owners, required, daily_limit, clock.today())?;
        Ok(Self {
            state,
            queue: TransactionQueue::new(),
            notices: NoticeLog::new(),
            executor,
            clock,
        })
    }

    /// Resume from a snapshot.
    pub fn restore(snapshot: WalletSnapshot, executor: E, clock: C) -> Self {
        Self {
            state: snapshot.state,
            queue: snapshot.queue,
            notices: NoticeLog::new(),
            executor,
            clock,
        }
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            state: self.state.clone(),
            queue: self.queue.clone(),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    // ---- queries ----

    pub fn required(&self) -> usize {
        self.state.quorum().required()
    }

    pub fn owner_count(&self) -> usize {
        self.state.owners().len()
    }

    /// Owner at a 0-based position; `None` for an empty slot.
    pub fn owner(&self, index: usize) -> Option<AccountId> {
        self.state.owners().get(index)
    }

    pub fn owners(&self) -> Vec<AccountId> {
        self.state.owners().iter().map(|(_, owner)| owner).collect()
    }

    pub fn is_owner(&self, id: &AccountId) -> bool {
        self.state.is_owner(id)
    }

    pub fn has_confirmed(&self, operation: &OperationId, owner: &AccountId) -> bool {
        self.state.has_confirmed(operation, owner)
    }

    pub fn daily_limit(&self) -> u128 {
        self.state.daily().daily_limit()
    }

    pub fn spent_today(&self) -> u128 {
        self.state.daily().spent_today()
    }

    /// Allowance still available today.
    pub fn remaining_today(&self) -> u128 {
        self.state.daily().remaining(self.clock.today())
    }

    pub fn pending_operations(&self) -> Vec<OperationId> {
        self.state.pending().open_operations()
    }

    /// Confirmations still needed for an open operation.
    pub fn votes_remaining(&self, operation: &OperationId) -> Option<usize> {
        self.state.pending().get(operation).map(|p| p.votes_remaining)
    }

    pub fn queued(&self, operation: &OperationId) -> Option<&Action> {
        self.queue.get(operation)
    }

    /// Notices recorded since the last `take_notices`.
    pub fn notices(&self) -> &[Notice] {
        self.notices.as_slice()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }

    // ---- entry points ----

    /// Request `action` on `caller`'s authority. `nonce` distinguishes
    /// otherwise identical requests that should be voted on separately.
    pub async fn execute(
        &mut self,
        caller: &AccountId,
        action: Action,
        nonce: u64,
    ) -> WalletResult<Outcome> {
        let checkpoint = self.checkpoint();
        let result = self.execute_step(caller, action, nonce).await;
        self.settle(checkpoint, result)
    }

    /// Vote on a queued action.
    pub async fn confirm(
        &mut self,
        caller: &AccountId,
        operation: &OperationId,
    ) -> WalletResult<Outcome> {
        let checkpoint = self.checkpoint();
        let result = self.confirm_step(caller, *operation).await;
        self.settle(checkpoint, result)
    }

    /// Withdraw `caller`'s vote on an open operation.
    pub fn revoke(&mut self, caller: &AccountId, operation: &OperationId) -> Outcome {
        match self.state.revoke(caller, operation, &mut self.notices) {
            Ok(_) => Outcome::Pending(*operation),
            Err(reason) => Outcome::Ignored(reason),
        }
    }

    /// Accept value into the wallet. Anyone may deposit.
    pub fn deposit(&mut self, from: &AccountId, amount: u128) -> Outcome {
        if amount == 0 {
            return Outcome::Ignored(IgnoreReason::ZeroAmount);
        }
        self.notices.record(Notice::Deposit {
            from: *from,
            amount,
        });
        Outcome::Applied
    }

    pub fn add_owner(&mut self, caller: &AccountId, owner: AccountId) -> WalletResult<Outcome> {
        self.manage(caller, ManagementCall::AddOwner { owner })
    }

    pub fn remove_owner(&mut self, caller: &AccountId, owner: AccountId) -> WalletResult<Outcome> {
        self.manage(caller, ManagementCall::RemoveOwner { owner })
    }

    pub fn change_owner(
        &mut self,
        caller: &AccountId,
        from: AccountId,
        to: AccountId,
    ) -> WalletResult<Outcome> {
        self.manage(caller, ManagementCall::ChangeOwner { from, to })
    }

    pub fn change_requirement(
        &mut self,
        caller: &AccountId,
        required: usize,
    ) -> WalletResult<Outcome> {
        self.manage(caller, ManagementCall::ChangeRequirement { required })
    }

    pub fn set_daily_limit(&mut self, caller: &AccountId, limit: u128) -> WalletResult<Outcome> {
        self.manage(caller, ManagementCall::SetDailyLimit { limit })
    }

    pub fn reset_spent_today(&mut self, caller: &AccountId) -> WalletResult<Outcome> {
        self.manage(caller, ManagementCall::ResetSpentToday)
    }

    /// Vote on a management call and apply it once quorum is reached.
    pub fn manage(&mut self, caller: &AccountId, call: ManagementCall) -> WalletResult<Outcome> {
        let checkpoint = self.checkpoint();
        let result = self.manage_step(caller, call);
        self.settle(checkpoint, result)
    }

    // ---- steps ----

    fn checkpoint(&self) -> (WalletSnapshot, usize) {
        (self.snapshot(), self.notices.len())
    }

    fn settle(
        &mut self,
        (checkpoint, notice_count): (WalletSnapshot, usize),
        result: WalletResult<Outcome>,
    ) -> WalletResult<Outcome> {
        if let Err(e) = &result {
            warn!(error = %e, "step aborted, rolling back");
            self.state = checkpoint.state;
            self.queue = checkpoint.queue;
            self.notices.truncate(notice_count);
        }
        result
    }

    async fn execute_step(
        &mut self,
        caller: &AccountId,
        action: Action,
        nonce: u64,
    ) -> WalletResult<Outcome> {
        if !self.state.is_owner(caller) {
            debug!(caller = %caller.short(), "execute ignored: not an owner");
            return Ok(Outcome::Ignored(IgnoreReason::NotOwner));
        }

        let today = self.clock.today();
        let within_allowance =
            action.is_plain() && self.state.under_limit(caller, action.amount, today);
        if within_allowance || self.state.quorum().is_single() {
            let created = self.executor.execute(&action).await?;
            self.notices.record(Notice::SingleTransact {
                owner: *caller,
                amount: action.amount,
                recipient: action.recipient,
                payload: action.payload,
                created,
            });
            return Ok(Outcome::Executed(Execution {
                operation: OperationId::ZERO,
                created,
            }));
        }

        let operation = action.operation_id(nonce)?;
        self.queue.enqueue(operation, action);
        match self.state.authorize(caller, operation, &mut self.notices) {
            Ok(Vote::Satisfied) => self.run_queued(caller, operation).await,
            Ok(Vote::Recorded { .. }) | Ok(Vote::Duplicate) => {
                self.announce_pending(caller, operation);
                Ok(Outcome::Pending(operation))
            }
            Err(reason) => Ok(Outcome::Ignored(reason)),
        }
    }

    async fn confirm_step(
        &mut self,
        caller: &AccountId,
        operation: OperationId,
    ) -> WalletResult<Outcome> {
        if !self.state.is_owner(caller) {
            return Ok(Outcome::Ignored(IgnoreReason::NotOwner));
        }
        if !self.queue.contains(&operation) {
            debug!(%operation, "confirm ignored: unknown operation");
            return Ok(Outcome::Ignored(IgnoreReason::UnknownOperation));
        }
        match self.state.authorize(caller, operation, &mut self.notices) {
            Ok(Vote::Satisfied) => self.run_queued(caller, operation).await,
            Ok(Vote::Recorded { .. }) => Ok(Outcome::Pending(operation)),
            Ok(Vote::Duplicate) => Ok(Outcome::Ignored(IgnoreReason::AlreadyConfirmed)),
            Err(reason) => Ok(Outcome::Ignored(reason)),
        }
    }

    /// Run the queued action for an operation whose ledger entry is already gone.
    async fn run_queued(
        &mut self,
        caller: &AccountId,
        operation: OperationId,
    ) -> WalletResult<Outcome> {
        let Some(action) = self.queue.take(&operation) else {
            return Ok(Outcome::Ignored(IgnoreReason::UnknownOperation));
        };
        let created = self.executor.execute(&action).await?;
        self.notices.record(Notice::MultiTransact {
            owner: *caller,
            operation,
            amount: action.amount,
            recipient: action.recipient,
            payload: action.payload,
            created,
        });
        Ok(Outcome::Executed(Execution { operation, created }))
    }

    fn announce_pending(&mut self, caller: &AccountId, operation: OperationId) {
        let Some(action) = self.queue.get(&operation) else {
            return;
        };
        let notice = Notice::ConfirmationNeeded {
            operation,
            initiator: *caller,
            amount: action.amount,
            recipient: action.recipient,
            payload: action.payload.clone(),
        };
        self.notices.record(notice);
    }

    fn manage_step(&mut self, caller: &AccountId, call: ManagementCall) -> WalletResult<Outcome> {
        if !self.state.is_owner(caller) {
            return Ok(Outcome::Ignored(IgnoreReason::NotOwner));
        }
        if let Err(reason) = self.state.check(&call) {
            debug!(call = call.name(), reason = reason.describe(), "management call ignored");
            return Ok(Outcome::Ignored(reason));
        }
        let operation = call.operation_id()?;
        match self.state.authorize(caller, operation, &mut self.notices) {
            Ok(Vote::Satisfied) => match self.state.apply(call, &mut self.notices) {
                Ok(invalidated) => {
                    self.queue.discard(&invalidated);
                    Ok(Outcome::Applied)
                }
                Err(reason) => Ok(Outcome::Ignored(reason)),
            },
            Ok(Vote::Recorded { .. }) | Ok(Vote::Duplicate) => Ok(Outcome::Pending(operation)),
            Err(reason) => Ok(Outcome::Ignored(reason)),
        }
    }
}
