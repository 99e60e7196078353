//! Errors raised while constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("timestamp {0} does not fit in 32 bits")]
    TimestampOutOfRange(u64),
}
