//! TWAB, the time-weighted average balance engine.
//!
//! Every account keeps a fixed-capacity ring of checkpoints. Each checkpoint
//! records the balance from its timestamp onward and the running integral of
//! balance over time up to that instant:
//!
//! `cumulative(n) = cumulative(n-1) + balance(n-1) × (t(n) − t(n-1))`
//!
//! With the integral stored, the average balance over any window is two
//! binary searches and one integer division.
//!
//! This crate handles:
//! - Checkpoint storage with silent eviction of the oldest entry
//! - Point-in-time balance queries (piecewise constant between checkpoints)
//! - Range averages over arbitrary, possibly out-of-range windows
//! - Increase/decrease operations that keep the live balance and history in step

pub mod checkpoint;
pub mod error;
pub mod history;
pub mod ledger;
pub mod ring;

pub use checkpoint::{AccountDetails, Checkpoint};
pub use error::TwabError;
pub use ledger::{Account, BalanceUpdate, Savepoint};
pub use ring::{CheckpointRing, MAX_CARDINALITY};
