//! LMDB implementation of GaugeStore.

use std::sync::Arc;

use gauge_store::{GaugeStore, LedgerKind, StoreError};
use gauge_types::Address;
use heed::types::Bytes;
use heed::{Database, Env};

use crate::LmdbError;

const ADDRESS_LEN: usize = 20;

pub struct LmdbGaugeStore {
    env: Arc<Env>,
    stake_db: Database<Bytes, Bytes>,
    scale_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbGaugeStore {
    pub fn new(
        env: Arc<Env>,
        stake_db: Database<Bytes, Bytes>,
        scale_db: Database<Bytes, Bytes>,
        meta_db: Database<Bytes, Bytes>,
    ) -> Self {
        Self { env, stake_db, scale_db, meta_db }
    }

    fn ledger_db(&self, kind: LedgerKind) -> Database<Bytes, Bytes> {
        match kind {
            LedgerKind::Stake => self.stake_db,
            LedgerKind::Scale => self.scale_db,
        }
    }
}

impl GaugeStore for LmdbGaugeStore {
    fn put_ledger(&self, kind: LedgerKind, gauge: &Address, bytes: &[u8]) -> Result<(), StoreError> {
        let mut txn = self.env.write_txn().map_err(LmdbError::from)?;
        self.ledger_db(kind)
            .put(&mut txn, &gauge.as_bytes()[..], bytes)
            .map_err(LmdbError::from)?;
        txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_ledgers(&self, kind: LedgerKind) -> Result<Vec<(Address, Vec<u8>)>, StoreError> {
        let txn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        let iter = self.ledger_db(kind).iter(&txn).map_err(LmdbError::from)?;
        for item in iter {
            let (key, val) = item.map_err(LmdbError::from)?;
            let bytes: [u8; ADDRESS_LEN] = key.try_into().map_err(|_| LmdbError::BadKey {
                db: kind.as_str(),
                expected: ADDRESS_LEN,
                found: key.len(),
            })?;
            results.push((Address::new(bytes), val.to_vec()));
        }
        Ok(results)
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let txn = self.env.read_txn().map_err(LmdbError::from)?;
        let value = self.meta_db.get(&txn, key).map_err(LmdbError::from)?;
        Ok(value.map(<[u8]>::to_vec))
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut txn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db.put(&mut txn, key, value).map_err(LmdbError::from)?;
        txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::DEFAULT_MAP_SIZE;
    use crate::LmdbEnvironment;

    fn gauge(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    #[test]
    fn ledgers_are_separated_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let store = env.gauge_store();

        store.put_ledger(LedgerKind::Stake, &gauge(1), b"stake").unwrap();
        store.put_ledger(LedgerKind::Scale, &gauge(2), b"scale").unwrap();

        assert_eq!(store.iter_ledgers(LedgerKind::Stake).unwrap(), vec![(gauge(1), b"stake".to_vec())]);
        assert_eq!(store.iter_ledgers(LedgerKind::Scale).unwrap(), vec![(gauge(2), b"scale".to_vec())]);
    }

    #[test]
    fn put_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let store = env.gauge_store();

        store.put_ledger(LedgerKind::Stake, &gauge(1), b"old").unwrap();
        store.put_ledger(LedgerKind::Stake, &gauge(1), b"new").unwrap();
        assert_eq!(store.iter_ledgers(LedgerKind::Stake).unwrap(), vec![(gauge(1), b"new".to_vec())]);
    }

    #[test]
    fn missing_meta_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        assert_eq!(env.gauge_store().get_meta(b"absent").unwrap(), None);
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
            let store = env.gauge_store();
            store.put_meta(b"k", b"v").unwrap();
            store.put_ledger(LedgerKind::Scale, &gauge(7), b"s").unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let store = env.gauge_store();
        assert_eq!(store.get_meta(b"k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.iter_ledgers(LedgerKind::Scale).unwrap().len(), 1);
    }
}
