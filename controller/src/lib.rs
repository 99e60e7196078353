//! Gauge controller.
//!
//! Users deposit a token, then commit their free balance to gauges. Each gauge
//! keeps two time-weighted ledgers:
//! - a stake ledger (total user stake committed to the gauge);
//! - a scale ledger (weight set by governance; nonzero means the gauge exists).
//!
//! Reward distributors query average stake and scale over arbitrary windows.
//! Token custody and reward bookkeeping are injected collaborators.

pub mod access;
pub mod collaborators;
pub mod config;
pub mod controller;
pub mod error;
pub mod persistence;
pub mod token;

pub use access::AccessControl;
pub use collaborators::{GaugeRewards, TokenCustody};
pub use config::GaugeConfig;
pub use controller::{GaugeController, ScaleChange};
pub use error::GaugeError;
pub use token::LedgerToken;
