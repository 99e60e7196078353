//! Nullable infrastructure for deterministic testing.
//!
//! Everything the gauge controller talks to (clock, token, reward
//! distributor, storage) has a test-friendly stand-in here that:
//! - returns deterministic values;
//! - records what was asked of it;
//! - can be told to fail on demand;
//! - never touches the filesystem or network.

pub mod clock;
pub mod rewards;
pub mod store;
pub mod token;

pub use clock::NullClock;
pub use rewards::{NullRewards, RewardCall};
pub use store::NullGaugeStore;
pub use token::{NullToken, Transfer};
