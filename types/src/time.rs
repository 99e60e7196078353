//! Timestamp type used throughout the controller.
//!
//! Timestamps are Unix epoch seconds held in 32 bits. Sub-second resolution is
//! not supported.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in whole seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u32);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u32) -> Self {
        Self(secs)
    }

    /// Build a timestamp from a wider second count.
    pub fn try_from_secs(secs: u64) -> Result<Self, TypesError> {
        u32::try_from(secs)
            .map(Self)
            .map_err(|_| TypesError::TimestampOutOfRange(secs))
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }

    /// Seconds elapsed from this timestamp until `later` (zero if `later` is earlier).
    pub fn elapsed_since(&self, later: Timestamp) -> u32 {
        later.0.saturating_sub(self.0)
    }
}

impl From<u32> for Timestamp {
    fn from(secs: u32) -> Self {
        Self(secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_saturates() {
        let t = Timestamp::new(100);
        assert_eq!(t.elapsed_since(Timestamp::new(150)), 50);
        assert_eq!(t.elapsed_since(Timestamp::new(50)), 0);
    }

    #[test]
    fn wide_seconds_must_fit() {
        assert_eq!(Timestamp::try_from_secs(42).unwrap(), Timestamp::new(42));
        assert!(Timestamp::try_from_secs(u64::from(u32::MAX) + 1).is_err());
    }
}
