//! TWAB-specific errors.

use gauge_types::Timestamp;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TwabError {
    #[error("{message}: requested {requested}, available {available}")]
    InsufficientBalance {
        message: &'static str,
        requested: u128,
        available: u128,
    },

    #[error("arithmetic overflow in balance computation")]
    Overflow,

    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: Timestamp, end: Timestamp },

    #[error("checkpoint at {attempted} precedes newest checkpoint at {newest}")]
    NonMonotonicTimestamp {
        newest: Timestamp,
        attempted: Timestamp,
    },
}
