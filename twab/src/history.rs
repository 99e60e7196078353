//! Point and range queries over a checkpoint ring.
//!
//! Balance is piecewise constant: a checkpoint's balance holds from its own
//! timestamp until the next checkpoint. Only the integral is continuous, so a
//! range average weights each balance by how long it was held.
//!
//! Before the oldest retained checkpoint nothing is known, so queries there
//! assume the oldest retained balance (best effort after eviction). After the
//! newest checkpoint the live balance is extended up to the query instant.

use crate::checkpoint::{AccountDetails, Checkpoint};
use crate::error::TwabError;
use crate::ring::CheckpointRing;
use gauge_types::{Timestamp, U256};

/// Balance held at `target`.
pub fn balance_at(
    ring: &CheckpointRing,
    details: &AccountDetails,
    target: Timestamp,
    current: Timestamp,
) -> u128 {
    if target >= current {
        return details.balance;
    }
    let (before_or_at, _) = ring.binary_search(details, target, current);
    before_or_at.balance
}

/// Integral of balance from the epoch to `target`.
///
/// The stored cumulative values start at the first checkpoint ever written,
/// which may since have been evicted. Rebasing on the oldest retained
/// checkpoint (held since the epoch) makes the integral defined for every
/// target, including those older than the retained window.
pub fn cumulative_at(
    ring: &CheckpointRing,
    details: &AccountDetails,
    target: Timestamp,
    current: Timestamp,
) -> U256 {
    let oldest = match ring.oldest(details) {
        Some(cp) => cp,
        None => return U256::zero(),
    };
    let (before_or_at, _) = ring.binary_search(details, target, current);
    let baseline = Checkpoint {
        cumulative_balance: U256::zero(),
        timestamp: Timestamp::EPOCH,
        ..oldest
    };

    if target < oldest.timestamp {
        return baseline.cumulative_at(target);
    }
    // before_or_at.timestamp <= target here, and its cumulative already
    // includes everything since the oldest retained checkpoint.
    let since_oldest = before_or_at.cumulative_at(target) - oldest.cumulative_balance;
    baseline.cumulative_at(oldest.timestamp) + since_oldest
}

/// Time-weighted average balance over `[start, end]`, truncated toward zero.
///
/// `start == end` is the balance at that instant. `start > end` is rejected.
pub fn average_balance_between(
    ring: &CheckpointRing,
    details: &AccountDetails,
    start: Timestamp,
    end: Timestamp,
    current: Timestamp,
) -> Result<u128, TwabError> {
    if start > end {
        return Err(TwabError::InvalidRange { start, end });
    }
    if start == end {
        return Ok(balance_at(ring, details, start, current));
    }

    let area = cumulative_at(ring, details, end, current) - cumulative_at(ring, details, start, current);
    let duration = U256::from(end.as_secs() - start.as_secs());
    gauge_types::amount::narrow(area / duration).ok_or(TwabError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: u32) -> Timestamp {
        Timestamp::new(secs)
    }

    fn filled(capacity: u32, points: &[(u128, u32)]) -> (CheckpointRing, AccountDetails) {
        let mut ring = CheckpointRing::new(capacity);
        let mut details = AccountDetails::default();
        for &(balance, t) in points {
            details = ring.insert(&details, balance, ts(t)).unwrap().0;
        }
        (ring, details)
    }

    fn avg(ring: &CheckpointRing, d: &AccountDetails, s: u32, e: u32, now: u32) -> u128 {
        average_balance_between(ring, d, ts(s), ts(e), ts(now)).unwrap()
    }

    #[test]
    fn empty_account_is_zero_everywhere() {
        let ring = CheckpointRing::new(4);
        let d = AccountDetails::default();
        assert_eq!(balance_at(&ring, &d, ts(5), ts(10)), 0);
        assert_eq!(avg(&ring, &d, 0, 100, 50), 0);
    }

    #[test]
    fn balance_is_piecewise_constant() {
        let (ring, d) = filled(8, &[(0, 0), (100, 10), (50, 20)]);
        assert_eq!(balance_at(&ring, &d, ts(5), ts(30)), 0);
        assert_eq!(balance_at(&ring, &d, ts(10), ts(30)), 100);
        assert_eq!(balance_at(&ring, &d, ts(15), ts(30)), 100);
        assert_eq!(balance_at(&ring, &d, ts(20), ts(30)), 50);
        assert_eq!(balance_at(&ring, &d, ts(25), ts(30)), 50);
    }

    #[test]
    fn balance_at_or_after_current_is_live() {
        let (ring, d) = filled(8, &[(100, 10)]);
        assert_eq!(balance_at(&ring, &d, ts(30), ts(30)), 100);
        assert_eq!(balance_at(&ring, &d, ts(99), ts(30)), 100);
    }

    #[test]
    fn average_weights_by_holding_time() {
        let (ring, d) = filled(8, &[(0, 0), (100, 10), (50, 20)]);
        // 0 over [0,10), 100 over [10,20)
        assert_eq!(avg(&ring, &d, 0, 20, 40), 50);
        // 100 over [10,20), 50 over [20,30)
        assert_eq!(avg(&ring, &d, 10, 30, 40), 75);
        // 0*10 + 100*10 + 50*10 over 30s
        assert_eq!(avg(&ring, &d, 0, 30, 40), 50);
    }

    #[test]
    fn average_truncates_toward_zero() {
        let (ring, d) = filled(8, &[(10, 0), (11, 1)]);
        // (10 + 11 + 11) / 3 = 10.67
        assert_eq!(avg(&ring, &d, 0, 3, 100), 10);
    }

    #[test]
    fn average_of_single_instant_is_balance() {
        let (ring, d) = filled(8, &[(0, 0), (100, 10), (50, 20)]);
        for t in [0, 5, 10, 15, 20, 25] {
            assert_eq!(avg(&ring, &d, t, t, 30), balance_at(&ring, &d, ts(t), ts(30)));
        }
    }

    #[test]
    fn average_inside_one_segment_is_that_balance() {
        let (ring, d) = filled(8, &[(0, 0), (100, 10), (50, 20)]);
        assert_eq!(avg(&ring, &d, 11, 19, 30), 100);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let (ring, d) = filled(8, &[(100, 10)]);
        let err = average_balance_between(&ring, &d, ts(20), ts(10), ts(30)).unwrap_err();
        assert_eq!(err, TwabError::InvalidRange { start: ts(20), end: ts(10) });
    }

    #[test]
    fn window_extending_into_future_uses_live_balance() {
        let (ring, d) = filled(8, &[(100, 10), (40, 20)]);
        // 100 over [10,20), 40 over [20,30) (extrapolated past now=25)
        assert_eq!(avg(&ring, &d, 10, 30, 25), 70);
        assert_eq!(avg(&ring, &d, 50, 60, 25), 40);
    }

    #[test]
    fn window_before_history_uses_oldest_balance() {
        let (ring, d) = filled(8, &[(100, 10), (40, 20)]);
        assert_eq!(avg(&ring, &d, 0, 5, 30), 100);
        // 100 over [0,20), 40 over [20,30)
        assert_eq!(avg(&ring, &d, 0, 30, 40), 80);
    }

    #[test]
    fn eviction_falls_back_to_oldest_retained() {
        let (ring, d) = filled(2, &[(10, 0), (20, 10), (30, 20)]);
        // retained: (20 @ 10), (30 @ 20)
        assert_eq!(balance_at(&ring, &d, ts(5), ts(40)), 20);
        assert_eq!(avg(&ring, &d, 0, 10, 40), 20);
        assert_eq!(avg(&ring, &d, 10, 30, 40), 25);
    }

    #[test]
    fn cumulative_is_monotonic_in_target() {
        let (ring, d) = filled(3, &[(5, 0), (0, 10), (9, 20), (1, 30)]);
        let mut last = U256::zero();
        for t in 0..60 {
            let c = cumulative_at(&ring, &d, ts(t), ts(45));
            assert!(c >= last);
            last = c;
        }
    }

    #[test]
    fn max_balance_average_does_not_overflow() {
        let (ring, d) = filled(4, &[(u128::MAX, 0), (u128::MAX, 1_000_000)]);
        assert_eq!(avg(&ring, &d, 0, 2_000_000, 3_000_000), u128::MAX);
    }
}
