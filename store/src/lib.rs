//! Abstract storage traits for the gauge controller.
//!
//! Storage backends (in-memory for testing, or a durable engine) implement
//! these traits. The controller depends only on the traits and serializes its
//! own types, so this crate never sees a checkpoint.

pub mod error;
pub mod ledger;

pub use error::StoreError;
pub use ledger::{GaugeStore, LedgerKind};
