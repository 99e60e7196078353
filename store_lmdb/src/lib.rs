//! LMDB storage backend for the gauge controller.
//!
//! Implements [`gauge_store::GaugeStore`] with the `heed` LMDB bindings. Stake
//! ledgers, scale ledgers and meta records each live in their own database
//! inside one environment.

pub mod environment;
pub mod error;
pub mod ledger;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use ledger::LmdbGaugeStore;
