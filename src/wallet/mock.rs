//! Test doubles for the executor and the day clock.

use super::daily_limit::DayClock;
use super::executor::{Executor, ExecutorError, ExecutorResult};
use super::operation::{Action, Recipient};
use crate::identity::AccountId;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Executor that records every action and can be told to fail.
#[derive(Clone, Default)]
pub struct MockExecutor {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    executed: Vec<Action>,
    fail_with: Option<ExecutorError>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following call with `error`.
    pub fn fail_with(&self, error: ExecutorError) {
        self.state.lock().unwrap().fail_with = Some(error);
    }

    /// Succeed again.
    pub fn succeed(&self) {
        self.state.lock().unwrap().fail_with = None;
    }

    /// Actions performed so far, in order.
    pub fn executed(&self) -> Vec<Action> {
        self.state.lock().unwrap().executed.clone()
    }

    pub fn execution_count(&self) -> usize {
        self.state.lock().unwrap().executed.len()
    }
}

/// Deterministic address for an account created by the `index`-th creation.
pub fn created_account(action: &Action, index: usize) -> AccountId {
    let mut hasher = Sha256::new();
    hasher.update(b"covenant-created-v1");
    hasher.update((index as u64).to_be_bytes());
    hasher.update(&action.payload);
    AccountId::from_bytes(&hasher.finalize())
}

#[async_trait]
impl Executor for MockExecutor {
    async fn execute(&self, action: &Action) -> ExecutorResult<Option<AccountId>> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = &state.fail_with {
            return Err(error.clone());
        }
        let created = match action.recipient {
            Recipient::Create => Some(created_account(action, state.executed.len())),
            Recipient::Account(_) => None,
        };
        state.executed.push(action.clone());
        Ok(created)
    }
}

/// Day clock the test moves by hand.
#[derive(Clone, Default)]
pub struct ManualClock {
    day: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(day: u64) -> Self {
        Self {
            day: Arc::new(AtomicU64::new(day)),
        }
    }

    pub fn advance(&self, days: u64) {
        self.day.fetch_add(days, Ordering::SeqCst);
    }
}

impl DayClock for ManualClock {
    fn today(&self) -> u64 {
        self.day.load(Ordering::SeqCst)
    }
}
