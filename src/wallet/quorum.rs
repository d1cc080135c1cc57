//! Quorum policy: how many distinct owners must confirm a deferred action.

use super::outcome::IgnoreReason;
use serde::{Deserialize, Serialize};

/// Required confirmation count. Always `1 <= required <= owner_count` once
/// validated against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumPolicy {
    required: usize,
}

impl QuorumPolicy {
    /// Validate `required` against the current owner count.
    pub fn new(required: usize, owner_count: usize) -> Result<Self, IgnoreReason> {
        Self::check(required, owner_count)?;
        Ok(Self { required })
    }

    /// Whether `required` is acceptable for `owner_count` owners.
    pub fn check(required: usize, owner_count: usize) -> Result<(), IgnoreReason> {
        if required == 0 || required > owner_count {
            return Err(IgnoreReason::InvalidRequirement);
        }
        Ok(())
    }

    pub fn required(&self) -> usize {
        self.required
    }

    /// A single confirmation executes immediately.
    pub fn is_single(&self) -> bool {
        self.required == 1
    }

    /// Replace the requirement, validated against `owner_count`.
    pub fn set(&mut self, required: usize, owner_count: usize) -> Result<(), IgnoreReason> {
        Self::check(required, owner_count)?;
        self.required = required;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_rejected() {
        assert_eq!(
            QuorumPolicy::new(0, 3),
            Err(IgnoreReason::InvalidRequirement)
        );
    }

    #[test]
    fn test_above_owner_count_rejected() {
        assert_eq!(
            QuorumPolicy::new(4, 3),
            Err(IgnoreReason::InvalidRequirement)
        );
    }

    #[test]
    fn test_set_keeps_old_value_on_failure() {
        let mut policy = QuorumPolicy::new(2, 3).unwrap();
        assert!(policy.set(5, 3).is_err());
        assert_eq!(policy.required(), 2);
        policy.set(3, 3).unwrap();
        assert_eq!(policy.required(), 3);
    }

    #[test]
    fn test_is_single() {
        assert!(QuorumPolicy::new(1, 3).unwrap().is_single());
        assert!(!QuorumPolicy::new(2, 3).unwrap().is_single());
    }

    proptest! {
        #[test]
        fn prop_required_always_in_bounds(required in 0usize..300, owners in 0usize..260) {
            match QuorumPolicy::new(required, owners) {
                Ok(policy) => {
                    prop_assert!(policy.required() >= 1);
                    prop_assert!(policy.required() <= owners);
                }
                Err(reason) => prop_assert_eq!(reason, IgnoreReason::InvalidRequirement),
            }
        }
    }
}
