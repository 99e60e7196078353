//! Account balance ledger: live balance plus checkpoint history.

use crate::checkpoint::{AccountDetails, Checkpoint};
use crate::error::TwabError;
use crate::history;
use crate::ring::CheckpointRing;
use gauge_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Outcome of a balance change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceUpdate {
    pub details: AccountDetails,
    pub previous_balance: u128,
    pub new_balance: u128,
}

/// State needed to undo the next balance change on an [`Account`].
#[derive(Clone, Copy, Debug)]
pub struct Savepoint {
    details: AccountDetails,
    displaced: Option<Checkpoint>,
}

/// A time-weighted account.
///
/// Every change to the balance appends a checkpoint, so the ring always ends
/// with the live balance. A failed change leaves the account untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    details: AccountDetails,
    ring: CheckpointRing,
}

impl Account {
    pub fn new(capacity: u32) -> Self {
        Self {
            details: AccountDetails::default(),
            ring: CheckpointRing::new(capacity),
        }
    }

    pub fn details(&self) -> &AccountDetails {
        &self.details
    }

    pub fn balance(&self) -> u128 {
        self.details.balance
    }

    pub fn capacity(&self) -> u32 {
        self.ring.capacity()
    }

    pub fn checkpoint_count(&self) -> u32 {
        self.details.cardinality
    }

    pub fn newest_checkpoint(&self) -> Option<Checkpoint> {
        self.ring.newest(&self.details)
    }

    pub fn oldest_checkpoint(&self) -> Option<Checkpoint> {
        self.ring.oldest(&self.details)
    }

    /// Retained checkpoints, oldest first.
    pub fn checkpoints(&self) -> impl Iterator<Item = Checkpoint> + '_ {
        self.ring.iter(&self.details)
    }

    /// Whether the live details agree with the stored ring.
    pub fn is_consistent(&self) -> bool {
        self.ring.is_consistent(&self.details)
    }

    pub fn increase_balance(
        &mut self,
        amount: u128,
        timestamp: Timestamp,
    ) -> Result<BalanceUpdate, TwabError> {
        let previous_balance = self.details.balance;
        let new_balance = previous_balance
            .checked_add(amount)
            .ok_or(TwabError::Overflow)?;
        self.record(previous_balance, new_balance, timestamp)
    }

    /// Subtract `amount`, failing with `message` if the balance is too small.
    ///
    /// A checkpoint is written even though the balance drops, so range
    /// averages see the decrease at the right instant.
    pub fn decrease_balance(
        &mut self,
        amount: u128,
        message: &'static str,
        timestamp: Timestamp,
    ) -> Result<BalanceUpdate, TwabError> {
        let previous_balance = self.details.balance;
        let new_balance =
            previous_balance
                .checked_sub(amount)
                .ok_or(TwabError::InsufficientBalance {
                    message,
                    requested: amount,
                    available: previous_balance,
                })?;
        self.record(previous_balance, new_balance, timestamp)
    }

    fn record(
        &mut self,
        previous_balance: u128,
        new_balance: u128,
        timestamp: Timestamp,
    ) -> Result<BalanceUpdate, TwabError> {
        let (details, _) = self.ring.insert(&self.details, new_balance, timestamp)?;
        self.details = details;
        Ok(BalanceUpdate {
            details,
            previous_balance,
            new_balance,
        })
    }

    /// Capture what is needed to undo the next balance change.
    ///
    /// Only the single change made right after the savepoint can be undone.
    pub fn savepoint(&self) -> Savepoint {
        Savepoint {
            details: self.details,
            displaced: self.ring.displaced_by_next(&self.details),
        }
    }

    /// Undo the one balance change made since `savepoint` was taken.
    ///
    /// Also correct when the change failed and nothing was written.
    pub fn rollback(&mut self, savepoint: Savepoint) {
        self.ring
            .restore_slot(savepoint.details.next_checkpoint_index, savepoint.displaced);
        self.details = savepoint.details;
    }

    /// Balance held at `target`.
    ///
    /// Instants before the oldest retained checkpoint report the oldest
    /// balance, whether older checkpoints were evicted or never existed.
    pub fn balance_at(&self, target: Timestamp, current: Timestamp) -> u128 {
        history::balance_at(&self.ring, &self.details, target, current)
    }

    /// Time-weighted average balance over `[start, end)`.
    ///
    /// Time before the oldest retained checkpoint is counted at the oldest
    /// balance, even on a ring that never filled. An account whose first
    /// checkpoint is a deposit therefore looks as if it held that deposit
    /// since the epoch. Reward consumers that must see zero before the first
    /// deposit should seed the account with a zero change at the start of
    /// its history.
    pub fn average_balance_between(
        &self,
        start: Timestamp,
        end: Timestamp,
        current: Timestamp,
    ) -> Result<u128, TwabError> {
        history::average_balance_between(&self.ring, &self.details, start, end, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: u32) -> Timestamp {
        Timestamp::new(secs)
    }

    #[test]
    fn time_before_first_deposit_counts_at_oldest_balance() {
        let mut unseeded = Account::new(8);
        unseeded.increase_balance(100, ts(10)).unwrap();
        assert_eq!(unseeded.balance_at(ts(5), ts(20)), 100);
        assert_eq!(unseeded.average_balance_between(ts(0), ts(20), ts(20)).unwrap(), 100);

        let mut seeded = Account::new(8);
        seeded.increase_balance(0, ts(0)).unwrap();
        seeded.increase_balance(100, ts(10)).unwrap();
        assert_eq!(seeded.balance_at(ts(5), ts(20)), 0);
        assert_eq!(seeded.average_balance_between(ts(0), ts(20), ts(20)).unwrap(), 50);
    }

    #[test]
    fn increase_records_checkpoint() {
        let mut account = Account::new(8);
        let update = account.increase_balance(100, ts(10)).unwrap();
        assert_eq!(update.previous_balance, 0);
        assert_eq!(update.new_balance, 100);
        assert_eq!(update.details.cardinality, 1);
        assert_eq!(account.balance(), 100);
        assert_eq!(account.newest_checkpoint().unwrap().timestamp, ts(10));
    }

    #[test]
    fn decrease_records_checkpoint() {
        let mut account = Account::new(8);
        account.increase_balance(100, ts(10)).unwrap();
        let update = account.decrease_balance(30, "stake too low", ts(20)).unwrap();
        assert_eq!(update.previous_balance, 100);
        assert_eq!(update.new_balance, 70);
        assert_eq!(account.checkpoint_count(), 2);
        assert_eq!(account.balance_at(ts(15), ts(30)), 100);
        assert_eq!(account.balance_at(ts(25), ts(30)), 70);
    }

    #[test]
    fn decrease_below_zero_carries_message() {
        let mut account = Account::new(8);
        account.increase_balance(10, ts(1)).unwrap();
        let err = account.decrease_balance(11, "stake too low", ts(2)).unwrap_err();
        assert_eq!(
            err,
            TwabError::InsufficientBalance {
                message: "stake too low",
                requested: 11,
                available: 10,
            }
        );
        assert_eq!(err.to_string(), "stake too low: requested 11, available 10");
        assert_eq!(account.balance(), 10);
        assert_eq!(account.checkpoint_count(), 1);
    }

    #[test]
    fn overflow_leaves_account_untouched() {
        let mut account = Account::new(8);
        account.increase_balance(u128::MAX, ts(1)).unwrap();
        let before = account.clone();
        assert_eq!(account.increase_balance(1, ts(2)), Err(TwabError::Overflow));
        assert_eq!(account, before);
    }

    #[test]
    fn out_of_order_change_leaves_account_untouched() {
        let mut account = Account::new(8);
        account.increase_balance(5, ts(10)).unwrap();
        let before = account.clone();
        assert!(account.increase_balance(5, ts(9)).is_err());
        assert_eq!(account, before);
    }

    #[test]
    fn increase_then_decrease_restores_live_balance() {
        let mut account = Account::new(8);
        account.increase_balance(40, ts(1)).unwrap();
        account.increase_balance(60, ts(5)).unwrap();
        account.decrease_balance(60, "underflow", ts(5)).unwrap();
        assert_eq!(account.balance(), 40);
        assert_eq!(account.checkpoint_count(), 3);
    }

    #[test]
    fn rollback_undoes_growing_insert() {
        let mut account = Account::new(4);
        account.increase_balance(10, ts(1)).unwrap();
        let before = account.clone();
        let savepoint = account.savepoint();
        account.increase_balance(5, ts(2)).unwrap();
        account.rollback(savepoint);
        assert_eq!(account, before);
    }

    #[test]
    fn rollback_undoes_overwriting_insert() {
        let mut account = Account::new(2);
        for t in 1..=3 {
            account.increase_balance(1, ts(t)).unwrap();
        }
        let before = account.clone();
        let savepoint = account.savepoint();
        account.decrease_balance(2, "underflow", ts(9)).unwrap();
        assert_ne!(account, before);
        account.rollback(savepoint);
        assert_eq!(account, before);
        assert!(account.is_consistent());
    }

    #[test]
    fn rollback_restores_single_slot_ring() {
        let mut account = Account::new(1);
        account.increase_balance(7, ts(1)).unwrap();
        let before = account.clone();
        let savepoint = account.savepoint();
        account.increase_balance(0, ts(5)).unwrap();
        assert_eq!(account.details(), before.details());
        account.rollback(savepoint);
        assert_eq!(account, before);
    }

    #[test]
    fn rollback_without_change_is_noop() {
        let mut account = Account::new(2);
        account.increase_balance(1, ts(1)).unwrap();
        let before = account.clone();
        let savepoint = account.savepoint();
        assert!(account.decrease_balance(5, "underflow", ts(2)).is_err());
        account.rollback(savepoint);
        assert_eq!(account, before);
    }

    #[test]
    fn checkpoints_iterate_oldest_first() {
        let mut account = Account::new(2);
        for t in 1..=4 {
            account.increase_balance(1, ts(t)).unwrap();
        }
        let balances: Vec<_> = account.checkpoints().map(|c| c.balance).collect();
        assert_eq!(balances, vec![3, 4]);
        assert_eq!(account.oldest_checkpoint().unwrap().timestamp, ts(3));
    }

    #[test]
    fn account_survives_bincode() {
        let mut account = Account::new(4);
        account.increase_balance(100, ts(10)).unwrap();
        account.decrease_balance(25, "underflow", ts(20)).unwrap();
        let bytes = bincode::serialize(&account).unwrap();
        let restored: Account = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, account);
        assert_eq!(
            restored.average_balance_between(ts(10), ts(30), ts(30)).unwrap(),
            (100 * 10 + 75 * 10) / 20
        );
    }
}
