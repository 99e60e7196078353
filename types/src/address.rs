//! 20-byte account address used for users, gauges, tokens and the controller itself.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An account address. The all-zero address is the "null" address and is
/// rejected wherever an owner or token is required.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Convenience constructor: an address whose low 8 bytes are `n`, big-endian.
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = TypesError;

    /// Parse a hex address, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let decoded =
            hex::decode(digits).map_err(|e| TypesError::InvalidAddress(format!("{s}: {e}")))?;
        let bytes: [u8; 20] = decoded.try_into().map_err(|v: Vec<u8>| {
            TypesError::InvalidAddress(format!("{s}: expected 20 bytes, got {}", v.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(&self.0[16..]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_low_u64(1).is_zero());
    }

    #[test]
    fn parses_with_and_without_prefix() {
        let a: Address = "0x00000000000000000000000000000000000000ff".parse().unwrap();
        let b: Address = "00000000000000000000000000000000000000ff".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Address::from_low_u64(0xff));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!("0xabcd".parse::<Address>().is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!("0xzz000000000000000000000000000000000000ff".parse::<Address>().is_err());
    }

    #[test]
    fn display_is_full_hex() {
        let a = Address::from_low_u64(0x1234);
        assert_eq!(a.to_string(), "0x0000000000000000000000000000000000001234");
    }
}
