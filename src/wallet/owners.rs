//! Owner registry: a bounded arena of owner slots.
//!
//! Slots are numbered from 1; an absent slot is `None`, never a zero value.
//! Each live owner occupies exactly one slot and the reverse index always
//! agrees with the forward table. Removal compacts the table; adding only
//! compacts when the cursor has reached capacity.
//!
//! Slot numbers double as vote-bit positions in the pending ledger, so a slot
//! only moves during compaction, and every compaction happens in a step that
//! also clears all pending operations.

use super::outcome::IgnoreReason;
use crate::identity::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of owner slots.
pub const MAX_OWNERS: usize = 250;

/// A live owner's slot number (1..=MAX_OWNERS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerSlot(u8);

impl OwnerSlot {
    /// Slot for a 1-based number, if it is within capacity.
    pub fn new(number: usize) -> Option<Self> {
        if (1..=MAX_OWNERS).contains(&number) {
            Some(Self(number as u8))
        } else {
            None
        }
    }

    /// 1-based slot number.
    pub fn number(self) -> usize {
        self.0 as usize
    }

    fn position(self) -> usize {
        self.number() - 1
    }
}

/// Owner table with reverse lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRegistry {
    /// `slots[n - 1]` holds slot `n`. The length is the cursor.
    slots: Vec<Option<AccountId>>,
    index: HashMap<AccountId, OwnerSlot>,
}

impl OwnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an initial owner list. Duplicates and overflow are reported
    /// as `Err` with the offending reason.
    pub fn from_owners(owners: &[AccountId]) -> Result<Self, IgnoreReason> {
        let mut registry = Self::new();
        for owner in owners {
            registry.add(*owner)?;
        }
        Ok(registry)
    }

    /// Number of live owners.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// One past the highest slot position that may be occupied.
    pub fn cursor(&self) -> usize {
        self.slots.len()
    }

    pub fn contains(&self, owner: &AccountId) -> bool {
        self.index.contains_key(owner)
    }

    pub fn slot_of(&self, owner: &AccountId) -> Option<OwnerSlot> {
        self.index.get(owner).copied()
    }

    /// Owner at a 0-based position. `None` for holes and positions past the cursor.
    pub fn get(&self, position: usize) -> Option<AccountId> {
        self.slots.get(position).copied().flatten()
    }

    /// Live owners in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (OwnerSlot, AccountId)> + '_ {
        self.slots.iter().enumerate().filter_map(|(pos, slot)| {
            slot.and_then(|owner| OwnerSlot::new(pos + 1).map(|s| (s, owner)))
        })
    }

    /// Whether `add` would succeed, without mutating.
    pub fn check_add(&self, owner: &AccountId) -> Result<(), IgnoreReason> {
        if self.contains(owner) {
            return Err(IgnoreReason::AlreadyOwner);
        }
        if self.len() >= MAX_OWNERS {
            return Err(IgnoreReason::RegistryFull);
        }
        Ok(())
    }

    /// Append an owner, compacting first if the cursor is at capacity.
    pub fn add(&mut self, owner: AccountId) -> Result<OwnerSlot, IgnoreReason> {
        self.check_add(&owner)?;
        if self.cursor() >= MAX_OWNERS {
            self.reorganize();
        }
        let slot = OwnerSlot::new(self.cursor() + 1).ok_or(IgnoreReason::RegistryFull)?;
        self.slots.push(Some(owner));
        self.index.insert(owner, slot);
        Ok(slot)
    }

    /// Whether `remove` would succeed under a quorum of `required`.
    pub fn check_remove(&self, owner: &AccountId, required: usize) -> Result<(), IgnoreReason> {
        if !self.contains(owner) {
            return Err(IgnoreReason::NotAnOwner);
        }
        if self.len() - 1 < required {
            return Err(IgnoreReason::BelowQuorumFloor);
        }
        Ok(())
    }

    /// Clear an owner's slot and compact the table.
    pub fn remove(&mut self, owner: &AccountId, required: usize) -> Result<OwnerSlot, IgnoreReason> {
        self.check_remove(owner, required)?;
        let slot = self.index.remove(owner).ok_or(IgnoreReason::NotAnOwner)?;
        self.slots[slot.position()] = None;
        self.reorganize();
        Ok(slot)
    }

    /// Whether `replace` would succeed.
    pub fn check_replace(&self, from: &AccountId, to: &AccountId) -> Result<(), IgnoreReason> {
        if self.contains(to) {
            return Err(IgnoreReason::AlreadyOwner);
        }
        if !self.contains(from) {
            return Err(IgnoreReason::NotAnOwner);
        }
        Ok(())
    }

    /// Put `to` into `from`'s slot.
    pub fn replace(&mut self, from: &AccountId, to: AccountId) -> Result<OwnerSlot, IgnoreReason> {
        self.check_replace(from, &to)?;
        let slot = self.index.remove(from).ok_or(IgnoreReason::NotAnOwner)?;
        self.slots[slot.position()] = Some(to);
        self.index.insert(to, slot);
        Ok(slot)
    }

    /// Move the highest occupied slots into the lowest holes until the table
    /// is dense, then shrink the cursor past trailing holes.
    pub fn reorganize(&mut self) {
        self.trim();
        let mut free = 0;
        loop {
            while free < self.slots.len() && self.slots[free].is_some() {
                free += 1;
            }
            if free >= self.slots.len() {
                break;
            }
            // trim() guarantees the last slot is occupied and it sits above `free`
            let Some(Some(owner)) = self.slots.pop() else {
                break;
            };
            self.slots[free] = Some(owner);
            if let Some(slot) = OwnerSlot::new(free + 1) {
                self.index.insert(owner, slot);
            }
            self.trim();
        }
    }

    fn trim(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn owner(n: u8) -> AccountId {
        AccountId::new([n; 32])
    }

    fn owner_n(n: usize) -> AccountId {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&(n as u64).to_be_bytes());
        bytes[31] = 1;
        AccountId::new(bytes)
    }

    fn assert_consistent(registry: &OwnerRegistry) {
        for (owner, slot) in &registry.index {
            assert_eq!(registry.slots[slot.position()], Some(*owner));
        }
        let live = registry.slots.iter().filter(|s| s.is_some()).count();
        assert_eq!(live, registry.index.len());
    }

    #[test]
    fn test_add_assigns_sequential_slots() {
        let mut registry = OwnerRegistry::new();
        assert_eq!(registry.add(owner(1)).unwrap().number(), 1);
        assert_eq!(registry.add(owner(2)).unwrap().number(), 2);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0), Some(owner(1)));
        assert_eq!(registry.get(1), Some(owner(2)));
        assert_eq!(registry.get(2), None);
    }

    #[test]
    fn test_add_duplicate_ignored() {
        let mut registry = OwnerRegistry::from_owners(&[owner(1)]).unwrap();
        assert_eq!(registry.add(owner(1)), Err(IgnoreReason::AlreadyOwner));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_compacts_highest_into_hole() {
        let mut registry = OwnerRegistry::from_owners(&[owner(1), owner(2), owner(3)]).unwrap();
        registry.remove(&owner(1), 1).unwrap();

        assert_eq!(registry.cursor(), 2);
        assert_eq!(registry.get(0), Some(owner(3)));
        assert_eq!(registry.get(1), Some(owner(2)));
        assert_eq!(registry.slot_of(&owner(3)).unwrap().number(), 1);
        assert!(!registry.contains(&owner(1)));
        assert_consistent(&registry);
    }

    #[test]
    fn test_remove_respects_quorum_floor() {
        let mut registry = OwnerRegistry::from_owners(&[owner(1), owner(2)]).unwrap();
        assert_eq!(
            registry.remove(&owner(1), 2),
            Err(IgnoreReason::BelowQuorumFloor)
        );
        assert!(registry.contains(&owner(1)));
        assert!(registry.remove(&owner(1), 1).is_ok());
    }

    #[test]
    fn test_remove_unknown_ignored() {
        let mut registry = OwnerRegistry::from_owners(&[owner(1)]).unwrap();
        assert_eq!(registry.remove(&owner(9), 1), Err(IgnoreReason::NotAnOwner));
    }

    #[test]
    fn test_replace_keeps_slot() {
        let mut registry = OwnerRegistry::from_owners(&[owner(1), owner(2)]).unwrap();
        let slot = registry.replace(&owner(2), owner(7)).unwrap();

        assert_eq!(slot.number(), 2);
        assert_eq!(registry.slot_of(&owner(7)), Some(slot));
        assert!(!registry.contains(&owner(2)));
        assert_consistent(&registry);
    }

    #[test]
    fn test_replace_rejects_existing_target() {
        let mut registry = OwnerRegistry::from_owners(&[owner(1), owner(2)]).unwrap();
        assert_eq!(
            registry.replace(&owner(1), owner(2)),
            Err(IgnoreReason::AlreadyOwner)
        );
        assert_eq!(
            registry.replace(&owner(5), owner(6)),
            Err(IgnoreReason::NotAnOwner)
        );
    }

    #[test]
    fn test_registry_full() {
        let owners: Vec<_> = (0..MAX_OWNERS).map(owner_n).collect();
        let mut registry = OwnerRegistry::from_owners(&owners).unwrap();
        assert_eq!(registry.len(), MAX_OWNERS);
        assert_eq!(
            registry.add(owner_n(MAX_OWNERS)),
            Err(IgnoreReason::RegistryFull)
        );
    }

    #[test]
    fn test_add_at_capacity_reclaims_hole() {
        let owners: Vec<_> = (0..MAX_OWNERS).map(owner_n).collect();
        let mut registry = OwnerRegistry::from_owners(&owners).unwrap();

        // Punch a hole without compacting, as a lazily-kept table would have.
        let slot = registry.index.remove(&owner_n(10)).unwrap();
        registry.slots[slot.position()] = None;
        assert_eq!(registry.cursor(), MAX_OWNERS);

        let added = registry.add(owner_n(1000)).unwrap();
        assert_eq!(registry.len(), MAX_OWNERS);
        assert_eq!(added.number(), MAX_OWNERS);
        assert_eq!(registry.get(10), Some(owner_n(MAX_OWNERS - 1)));
        assert_consistent(&registry);
    }

    #[test]
    fn test_reorganize_idempotent() {
        let mut registry = OwnerRegistry::from_owners(&[owner(1), owner(2), owner(3), owner(4)]).unwrap();
        registry.index.remove(&owner(2));
        registry.slots[1] = None;
        registry.index.remove(&owner(4));
        registry.slots[3] = None;

        registry.reorganize();
        let once = registry.clone();
        registry.reorganize();

        assert_eq!(registry, once);
        assert_eq!(registry.cursor(), 2);
        assert_consistent(&registry);
    }

    #[test]
    fn test_iter_skips_holes() {
        let mut registry = OwnerRegistry::from_owners(&[owner(1), owner(2), owner(3)]).unwrap();
        registry.index.remove(&owner(2));
        registry.slots[1] = None;
        let live: Vec<_> = registry.iter().map(|(_, o)| o).collect();
        assert_eq!(live, vec![owner(1), owner(3)]);
    }

    #[test]
    fn test_slot_bounds() {
        assert!(OwnerSlot::new(0).is_none());
        assert!(OwnerSlot::new(1).is_some());
        assert!(OwnerSlot::new(MAX_OWNERS).is_some());
        assert!(OwnerSlot::new(MAX_OWNERS + 1).is_none());
    }

    proptest! {
        #[test]
        fn prop_index_matches_table(ops in proptest::collection::vec((any::<bool>(), 0u8..20), 0..80)) {
            let mut registry = OwnerRegistry::new();
            for (add, n) in ops {
                if add {
                    let _ = registry.add(owner(n));
                } else {
                    let _ = registry.remove(&owner(n), 0);
                }
                assert_consistent(&registry);
                // removal always compacts, so the table stays dense
                prop_assert_eq!(registry.cursor(), registry.len());
            }
        }
    }
}
