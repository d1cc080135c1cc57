//! Deferred actions waiting on quorum, keyed by operation id.

use super::operation::Action;
use crate::identity::OperationId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQueue {
    entries: HashMap<OperationId, Action>,
}

impl TransactionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `action` unless something is already queued under `operation`.
    /// Returns whether a new entry was stored.
    pub fn enqueue(&mut self, operation: OperationId, action: Action) -> bool {
        if self.entries.contains_key(&operation) {
            return false;
        }
        self.entries.insert(operation, action);
        true
    }

    pub fn get(&self, operation: &OperationId) -> Option<&Action> {
        self.entries.get(operation)
    }

    pub fn contains(&self, operation: &OperationId) -> bool {
        self.entries.contains_key(operation)
    }

    /// Remove and return the queued action.
    pub fn take(&mut self, operation: &OperationId) -> Option<Action> {
        self.entries.remove(operation)
    }

    /// Drop every listed entry; missing ones are skipped.
    pub fn discard<'a>(&mut self, operations: impl IntoIterator<Item = &'a OperationId>) {
        for operation in operations {
            self.entries.remove(operation);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
