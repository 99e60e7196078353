//! Nullable store: in-memory gauge storage for testing.

use gauge_store::{GaugeStore, LedgerKind, StoreError};
use gauge_types::Address;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// An in-memory [`GaugeStore`].
pub struct NullGaugeStore {
    ledgers: Mutex<HashMap<LedgerKind, BTreeMap<Address, Vec<u8>>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    fail_writes: Mutex<bool>,
}

impl NullGaugeStore {
    pub fn new() -> Self {
        Self {
            ledgers: Mutex::new(HashMap::new()),
            meta: Mutex::new(HashMap::new()),
            fail_writes: Mutex::new(false),
        }
    }

    /// Make every subsequent write return a backend error.
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn ledger_count(&self, kind: LedgerKind) -> usize {
        self.ledgers
            .lock()
            .unwrap()
            .get(&kind)
            .map_or(0, BTreeMap::len)
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if *self.fail_writes.lock().unwrap() {
            Err(StoreError::Backend("writes disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for NullGaugeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GaugeStore for NullGaugeStore {
    fn put_ledger(&self, kind: LedgerKind, gauge: &Address, bytes: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.ledgers
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .insert(*gauge, bytes.to_vec());
        Ok(())
    }

    fn iter_ledgers(&self, kind: LedgerKind) -> Result<Vec<(Address, Vec<u8>)>, StoreError> {
        Ok(self
            .ledgers
            .lock()
            .unwrap()
            .get(&kind)
            .map(|ledgers| ledgers.iter().map(|(a, b)| (*a, b.clone())).collect())
            .unwrap_or_default())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.meta.lock().unwrap().insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledgers_are_separated_by_kind() {
        let store = NullGaugeStore::new();
        let gauge = Address::from_low_u64(9);
        store.put_ledger(LedgerKind::Stake, &gauge, b"s").unwrap();
        assert_eq!(store.iter_ledgers(LedgerKind::Stake).unwrap(), vec![(gauge, b"s".to_vec())]);
        assert!(store.iter_ledgers(LedgerKind::Scale).unwrap().is_empty());
        assert_eq!(store.ledger_count(LedgerKind::Stake), 1);
    }

    #[test]
    fn failing_writes_report_backend_error() {
        let store = NullGaugeStore::new();
        store.fail_writes();
        assert!(matches!(store.put_meta(b"k", b"v"), Err(StoreError::Backend(_))));
    }
}
