//! Pending operation ledger: the multi-owner voting protocol.
//!
//! Each open operation records how many confirmations it still needs and
//! which owner slots have already voted. The final vote removes the record
//! before the caller acts on it, so an operation can be satisfied at most once.
//!
//! The open-operations index is append-only between clears. Completed
//! entries become tombstones; `clear_all` treats the index as a set and never
//! processes an identifier twice.

use super::owners::{OwnerSlot, MAX_OWNERS};
use crate::identity::OperationId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const VOTER_WORDS: usize = (MAX_OWNERS + 1).div_ceil(64);

/// One bit per owner slot. Bit 0 is never set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterSet([u64; VOTER_WORDS]);

impl VoterSet {
    fn locate(slot: OwnerSlot) -> (usize, u64) {
        let bit = slot.number();
        (bit / 64, 1u64 << (bit % 64))
    }

    pub fn contains(&self, slot: OwnerSlot) -> bool {
        let (word, mask) = Self::locate(slot);
        self.0[word] & mask != 0
    }

    pub fn insert(&mut self, slot: OwnerSlot) {
        let (word, mask) = Self::locate(slot);
        self.0[word] |= mask;
    }

    pub fn remove(&mut self, slot: OwnerSlot) {
        let (word, mask) = Self::locate(slot);
        self.0[word] &= !mask;
    }
}

/// Open vote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOperation {
    pub votes_remaining: usize,
    pub voters: VoterSet,
    pub sequence_index: usize,
}

/// Result of a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    /// Quorum met; the record is already gone.
    Satisfied,
    /// Vote counted; `remaining` more are needed.
    Recorded { remaining: usize },
    /// This slot had already voted. Nothing changed.
    Duplicate,
}

/// Result of a revocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revocation {
    /// Vote withdrawn; `remaining` confirmations are needed again.
    Revoked { remaining: usize },
    /// No open operation with that identifier.
    Unknown,
    /// The slot had not voted.
    NotVoted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLedger {
    operations: HashMap<OperationId, PendingOperation>,
    open_index: Vec<Option<OperationId>>,
}

impl PendingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `slot`'s confirmation of `operation` under a quorum of `required`.
    ///
    /// A quorum of one is satisfied by the first vote and never leaves a record.
    pub fn confirm_and_check(
        &mut self,
        operation: OperationId,
        slot: OwnerSlot,
        required: usize,
    ) -> Vote {
        if !self.operations.contains_key(&operation) {
            if required <= 1 {
                return Vote::Satisfied;
            }
            let sequence_index = self.open_index.len();
            self.open_index.push(Some(operation));
            self.operations.insert(
                operation,
                PendingOperation {
                    votes_remaining: required,
                    voters: VoterSet::default(),
                    sequence_index,
                },
            );
        }

        let Some(pending) = self.operations.get_mut(&operation) else {
            return Vote::Duplicate;
        };
        if pending.voters.contains(slot) {
            return Vote::Duplicate;
        }
        if pending.votes_remaining <= 1 {
            self.remove(&operation);
            return Vote::Satisfied;
        }
        pending.voters.insert(slot);
        pending.votes_remaining -= 1;
        Vote::Recorded {
            remaining: pending.votes_remaining,
        }
    }

    /// Withdraw `slot`'s vote on `operation`.
    pub fn revoke(&mut self, operation: &OperationId, slot: OwnerSlot) -> Revocation {
        let Some(pending) = self.operations.get_mut(operation) else {
            return Revocation::Unknown;
        };
        if !pending.voters.contains(slot) {
            return Revocation::NotVoted;
        }
        pending.voters.remove(slot);
        pending.votes_remaining += 1;
        Revocation::Revoked {
            remaining: pending.votes_remaining,
        }
    }

    pub fn has_confirmed(&self, operation: &OperationId, slot: OwnerSlot) -> bool {
        self.operations
            .get(operation)
            .is_some_and(|p| p.voters.contains(slot))
    }

    pub fn get(&self, operation: &OperationId) -> Option<&PendingOperation> {
        self.operations.get(operation)
    }

    pub fn contains(&self, operation: &OperationId) -> bool {
        self.operations.contains_key(operation)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Open operations in the order they were created.
    pub fn open_operations(&self) -> Vec<OperationId> {
        let mut seen = HashSet::new();
        self.open_index
            .iter()
            .flatten()
            .filter(|op| self.operations.contains_key(op) && seen.insert(**op))
            .copied()
            .collect()
    }

    /// Drop an open operation. The index entry is only tombstoned if it still
    /// names this operation.
    pub fn remove(&mut self, operation: &OperationId) -> Option<PendingOperation> {
        let pending = self.operations.remove(operation)?;
        if let Some(entry) = self.open_index.get_mut(pending.sequence_index) {
            if *entry == Some(*operation) {
                *entry = None;
            }
        }
        if self.operations.is_empty() {
            self.open_index.clear();
        }
        Some(pending)
    }

    /// Delete every open operation and empty the index. Returns the
    /// identifiers that were actually open, each once.
    pub fn clear_all(&mut self) -> Vec<OperationId> {
        let mut cleared = Vec::new();
        let mut seen = HashSet::new();
        for operation in self.open_index.drain(..).flatten() {
            if !seen.insert(operation) {
                continue;
            }
            if self.operations.remove(&operation).is_some() {
                cleared.push(operation);
            }
        }
        // anything the index lost track of goes too
        cleared.extend(self.operations.drain().map(|(op, _)| op));
        cleared
    }
}
