//! Controller state kept in an LMDB directory between `run` invocations.

use anyhow::Context;
use gauge_controller::{GaugeController, LedgerToken};
use gauge_store::GaugeStore;
use std::path::Path;

use gauge_store_lmdb::environment::DEFAULT_MAP_SIZE;
use gauge_store_lmdb::LmdbEnvironment;

/// The simulator's token balances, saved beside the controller's own records.
const TOKEN_KEY: &[u8] = b"cli_token";

pub fn open(dir: &Path) -> anyhow::Result<LmdbEnvironment> {
    LmdbEnvironment::open(dir, DEFAULT_MAP_SIZE)
        .with_context(|| format!("opening state directory {}", dir.display()))
}

/// Restore `controller` and its token from `store`. An empty store leaves
/// both as built.
pub fn load(controller: &mut GaugeController<LedgerToken>, store: &dyn GaugeStore) -> anyhow::Result<()> {
    let token: Option<LedgerToken> = match store.get_meta(TOKEN_KEY)? {
        Some(bytes) => Some(bincode::deserialize(&bytes).context("decoding saved token")?),
        None => None,
    };
    controller
        .load_state_from_store(store)
        .context("loading controller state")?;
    if let Some(token) = token {
        *controller.token_mut() = token;
    }
    Ok(())
}

pub fn save(controller: &GaugeController<LedgerToken>, store: &dyn GaugeStore) -> anyhow::Result<()> {
    controller
        .save_to_store(store)
        .context("saving controller state")?;
    let token = bincode::serialize(controller.token()).context("encoding token")?;
    store.put_meta(TOKEN_KEY, &token)?;
    tracing::info!("state saved");
    Ok(())
}
