//! Checkpoint records and per-account ring bookkeeping.

use gauge_types::{Timestamp, U256};
use serde::{Deserialize, Serialize};

/// An immutable balance observation.
///
/// `balance` holds from `timestamp` until the next checkpoint.
/// `cumulative_balance` is the integral of balance over time from the first
/// checkpoint ever written for the account up to `timestamp`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub balance: u128,
    pub cumulative_balance: U256,
    pub timestamp: Timestamp,
}

impl Checkpoint {
    /// Zero balance at time zero. Returned for accounts with no history.
    pub const SENTINEL: Self = Self {
        balance: 0,
        cumulative_balance: U256([0; 4]),
        timestamp: Timestamp::EPOCH,
    };

    /// The integral at `at`, assuming `self.balance` held from `self.timestamp`.
    ///
    /// `at` earlier than `self.timestamp` is treated as `self.timestamp`.
    pub fn cumulative_at(&self, at: Timestamp) -> U256 {
        let elapsed = self.timestamp.elapsed_since(at);
        self.cumulative_balance + U256::from(self.balance) * U256::from(elapsed)
    }
}

/// Live state of an account, kept beside its ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    /// Current balance. Always equal to the newest checkpoint's balance.
    pub balance: u128,
    /// Ring slot the next checkpoint is written to.
    pub next_checkpoint_index: u32,
    /// Number of valid checkpoints, capped at the ring capacity.
    pub cardinality: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_extends_linearly() {
        let cp = Checkpoint {
            balance: 7,
            cumulative_balance: U256::from(100),
            timestamp: Timestamp::new(10),
        };
        assert_eq!(cp.cumulative_at(Timestamp::new(10)), U256::from(100));
        assert_eq!(cp.cumulative_at(Timestamp::new(13)), U256::from(121));
    }

    #[test]
    fn cumulative_before_checkpoint_is_clamped() {
        let cp = Checkpoint {
            balance: 7,
            cumulative_balance: U256::from(100),
            timestamp: Timestamp::new(10),
        };
        assert_eq!(cp.cumulative_at(Timestamp::new(3)), U256::from(100));
    }

    #[test]
    fn sentinel_is_zeroed() {
        assert_eq!(Checkpoint::SENTINEL, Checkpoint::default());
    }
}
