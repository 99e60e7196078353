//! Fixed-capacity checkpoint ring.
//!
//! Slots are allocated lazily: the backing vector grows one entry per insert
//! until it reaches capacity, then the write cursor wraps and each insert
//! overwrites the oldest checkpoint.

use crate::checkpoint::{AccountDetails, Checkpoint};
use crate::error::TwabError;
use gauge_types::{Timestamp, U256};
use serde::{Deserialize, Serialize};

/// Largest supported ring capacity (a 24-bit cardinality).
pub const MAX_CARDINALITY: u32 = 16_777_215;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointRing {
    capacity: u32,
    slots: Vec<Checkpoint>,
}

impl CheckpointRing {
    /// Create an empty ring. `capacity` is clamped to `1..=MAX_CARDINALITY`.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity: capacity.clamp(1, MAX_CARDINALITY),
            slots: Vec::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Physical slot of the oldest retained checkpoint.
    fn oldest_slot(&self, details: &AccountDetails) -> u32 {
        if details.cardinality < self.capacity {
            0
        } else {
            details.next_checkpoint_index
        }
    }

    /// Checkpoint at logical position `i` (0 = oldest). `i` must be below cardinality.
    pub(crate) fn at(&self, details: &AccountDetails, i: u32) -> Checkpoint {
        let slot = (self.oldest_slot(details) as u64 + i as u64) % self.capacity as u64;
        self.slots[slot as usize]
    }

    pub fn newest(&self, details: &AccountDetails) -> Option<Checkpoint> {
        match details.cardinality {
            0 => None,
            n => Some(self.at(details, n - 1)),
        }
    }

    pub fn oldest(&self, details: &AccountDetails) -> Option<Checkpoint> {
        match details.cardinality {
            0 => None,
            _ => Some(self.at(details, 0)),
        }
    }

    /// Iterate retained checkpoints from oldest to newest.
    pub fn iter<'a>(&'a self, details: &'a AccountDetails) -> impl Iterator<Item = Checkpoint> + 'a {
        (0..details.cardinality).map(move |i| self.at(details, i))
    }

    /// Whether `details` describes this ring: slot count matches cardinality,
    /// the cursor is in range, timestamps never decrease and the live balance
    /// is the newest checkpoint's. Used to reject corrupt persisted state.
    pub fn is_consistent(&self, details: &AccountDetails) -> bool {
        if self.capacity == 0 || self.capacity > MAX_CARDINALITY {
            return false;
        }
        if details.cardinality > self.capacity
            || self.slots.len() != details.cardinality as usize
            || details.next_checkpoint_index >= self.capacity
        {
            return false;
        }
        if details.cardinality < self.capacity
            && details.next_checkpoint_index != details.cardinality
        {
            return false;
        }
        let chained = self
            .iter(details)
            .zip(self.iter(details).skip(1))
            .all(|(a, b)| {
                a.timestamp <= b.timestamp
                    && Some(b.cumulative_balance) == accumulate(&a, b.timestamp)
            });
        match self.newest(details) {
            // Leave room to extend the newest integral over the rest of the
            // 32-bit clock, twice over (query rebasing adds one more span).
            Some(newest) => {
                let span = U256::from(u128::MAX) * U256::from(u32::MAX);
                chained
                    && newest.balance == details.balance
                    && newest.cumulative_balance.checked_add(span + span).is_some()
            }
            None => details.balance == 0,
        }
    }

    /// Append a checkpoint recording `balance` from `timestamp` onward.
    ///
    /// Returns the updated details (with `balance` set) and the checkpoint that
    /// was newest before this insert. Nothing is written on error.
    pub fn insert(
        &mut self,
        details: &AccountDetails,
        balance: u128,
        timestamp: Timestamp,
    ) -> Result<(AccountDetails, Option<Checkpoint>), TwabError> {
        let previous = self.newest(details);

        let cumulative_balance = match previous {
            Some(prev) => {
                if timestamp < prev.timestamp {
                    return Err(TwabError::NonMonotonicTimestamp {
                        newest: prev.timestamp,
                        attempted: timestamp,
                    });
                }
                accumulate(&prev, timestamp).ok_or(TwabError::Overflow)?
            }
            None => U256::zero(),
        };

        let checkpoint = Checkpoint {
            balance,
            cumulative_balance,
            timestamp,
        };

        let slot = details.next_checkpoint_index as usize;
        if slot < self.slots.len() {
            self.slots[slot] = checkpoint;
        } else {
            self.slots.push(checkpoint);
        }

        let next = AccountDetails {
            balance,
            next_checkpoint_index: (details.next_checkpoint_index + 1) % self.capacity,
            cardinality: (details.cardinality + 1).min(self.capacity),
        };
        Ok((next, previous))
    }

    /// Slot content the next insert would overwrite (`None` if it would grow the ring).
    pub(crate) fn displaced_by_next(&self, details: &AccountDetails) -> Option<Checkpoint> {
        self.slots.get(details.next_checkpoint_index as usize).copied()
    }

    /// Put back what one insert at `slot` replaced.
    pub(crate) fn restore_slot(&mut self, slot: u32, displaced: Option<Checkpoint>) {
        match displaced {
            Some(cp) => self.slots[slot as usize] = cp,
            None => self.slots.truncate(slot as usize),
        }
    }

    /// Locate the tightest checkpoint pair bracketing `target`.
    ///
    /// Returns `(before_or_at, at_or_after)`:
    /// - empty ring: both are [`Checkpoint::SENTINEL`];
    /// - `target >= current`: both are a synthetic checkpoint carrying the live
    ///   balance at `current`;
    /// - `target` older than the oldest retained checkpoint: both are the oldest;
    /// - `target` at or after the newest checkpoint (but before `current`): the
    ///   newest checkpoint and the synthetic current one;
    /// - otherwise the last checkpoint at or before `target` and its successor.
    ///
    /// Several checkpoints sharing a timestamp resolve to the last of them.
    pub fn binary_search(
        &self,
        details: &AccountDetails,
        target: Timestamp,
        current: Timestamp,
    ) -> (Checkpoint, Checkpoint) {
        let cardinality = details.cardinality;
        if cardinality == 0 {
            return (Checkpoint::SENTINEL, Checkpoint::SENTINEL);
        }

        let newest = self.at(details, cardinality - 1);
        let synthetic = Checkpoint {
            balance: details.balance,
            cumulative_balance: newest.cumulative_at(current),
            timestamp: current.max(newest.timestamp),
        };

        if target >= current {
            return (synthetic, synthetic);
        }

        let oldest = self.at(details, 0);
        if target < oldest.timestamp {
            return (oldest, oldest);
        }
        if target >= newest.timestamp {
            return (newest, synthetic);
        }

        // Invariant: at(lo).timestamp <= target < at(hi).timestamp.
        let mut lo = 0u32;
        let mut hi = cardinality - 1;
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.at(details, mid).timestamp <= target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        (self.at(details, lo), self.at(details, hi))
    }
}

/// Cumulative value of a checkpoint written at `at` after `prev`.
fn accumulate(prev: &Checkpoint, at: Timestamp) -> Option<U256> {
    let elapsed = prev.timestamp.elapsed_since(at);
    U256::from(prev.balance)
        .checked_mul(U256::from(elapsed))
        .and_then(|area| prev.cumulative_balance.checked_add(area))
}
