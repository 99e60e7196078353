//! Ledger history storage trait.

use crate::StoreError;
use gauge_types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of a gauge's two time-weighted ledgers a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerKind {
    /// Sum of user stake committed to the gauge.
    Stake,
    /// Governance-set weight of the gauge.
    Scale,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stake => "stake",
            Self::Scale => "scale",
        }
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store trait for persisting gauge ledgers.
///
/// Values are opaque bytes: the controller encodes its own accounts and
/// balance tables, so the store does not depend on the TWAB crate.
pub trait GaugeStore {
    fn put_ledger(&self, kind: LedgerKind, gauge: &Address, bytes: &[u8]) -> Result<(), StoreError>;
    fn iter_ledgers(&self, kind: LedgerKind) -> Result<Vec<(Address, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
