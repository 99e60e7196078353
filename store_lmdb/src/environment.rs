//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::ledger::LmdbGaugeStore;
use crate::LmdbError;

/// Default map size: 1 GiB of address space, grown lazily by LMDB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

const STAKE_DB: &str = "stake_ledgers";
const SCALE_DB: &str = "scale_ledgers";
const META_DB: &str = "meta";
const MAX_DBS: u32 = 3;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    stake_db: Database<Bytes, Bytes>,
    scale_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment in the directory `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: heed requires that the same environment is not opened twice
        // in one process and that the files are not truncated while mapped.
        // The CLI opens one environment per invocation.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let stake_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(STAKE_DB))?;
        let scale_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(SCALE_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "LMDB environment opened");
        Ok(Self {
            env: Arc::new(env),
            stake_db,
            scale_db,
            meta_db,
        })
    }

    /// A [`gauge_store::GaugeStore`] over this environment.
    pub fn gauge_store(&self) -> LmdbGaugeStore {
        LmdbGaugeStore::new(self.env.clone(), self.stake_db, self.scale_db, self.meta_db)
    }
}
