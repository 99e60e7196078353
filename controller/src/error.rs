use gauge_store::StoreError;
use gauge_twab::TwabError;
use gauge_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GaugeError {
    #[error("{0} must not be the zero address")]
    ZeroAddress(&'static str),

    #[error("gauge {0} does not exist")]
    InvalidGauge(Address),

    #[error("caller {caller} is not authorized to {action}")]
    Unauthorized {
        caller: Address,
        action: &'static str,
    },

    #[error("{message}: requested {requested}, available {available}")]
    InsufficientBalance {
        message: &'static str,
        requested: u128,
        available: u128,
    },

    #[error("arithmetic overflow")]
    Overflow,

    #[error(transparent)]
    Twab(#[from] TwabError),

    #[error("token transfer failed: {0}")]
    Token(String),

    #[error("reward hook failed: {0}")]
    Rewards(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt persisted state: {0}")]
    Corrupt(String),

    #[error("configuration error: {0}")]
    Config(String),
}
