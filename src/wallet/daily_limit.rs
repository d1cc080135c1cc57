//! Daily spend allowance.
//!
//! Value transfers without a payload may skip quorum while the day's running
//! total stays within the limit. The total resets the first time the gate is
//! consulted on a later day.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds per epoch day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Source of the current day index.
pub trait DayClock: Send + Sync {
    /// Days since the Unix epoch.
    fn today(&self) -> u64;
}

/// Wall-clock day index.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDayClock;

impl DayClock for SystemDayClock {
    fn today(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() / SECONDS_PER_DAY)
            .unwrap_or(0)
    }
}

/// Limit, running total and the day the total belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLimitState {
    daily_limit: u128,
    spent_today: u128,
    last_day: u64,
}

impl DailyLimitState {
    pub fn new(daily_limit: u128, today: u64) -> Self {
        Self {
            daily_limit,
            spent_today: 0,
            last_day: today,
        }
    }

    pub fn daily_limit(&self) -> u128 {
        self.daily_limit
    }

    pub fn spent_today(&self) -> u128 {
        self.spent_today
    }

    pub fn last_day(&self) -> u64 {
        self.last_day
    }

    /// Allowance left on `today`, without committing anything.
    pub fn remaining(&self, today: u64) -> u128 {
        let spent = if today > self.last_day {
            0
        } else {
            self.spent_today
        };
        self.daily_limit.saturating_sub(spent)
    }

    /// Roll the day forward if needed, then commit `amount` if it fits.
    /// Returns `false` and commits nothing otherwise.
    pub fn under_limit(&mut self, amount: u128, today: u64) -> bool {
        if today > self.last_day {
            self.spent_today = 0;
            self.last_day = today;
        }
        match self.spent_today.checked_add(amount) {
            Some(total) if total <= self.daily_limit => {
                self.spent_today = total;
                true
            }
            _ => false,
        }
    }

    /// Replace the limit. A lower limit caps today's total so it never exceeds it.
    pub fn set_daily_limit(&mut self, daily_limit: u128) {
        self.daily_limit = daily_limit;
        self.spent_today = self.spent_today.min(daily_limit);
    }

    /// Zero today's total. The day index is left alone.
    pub fn reset_spent_today(&mut self) {
        self.spent_today = 0;
    }
}
