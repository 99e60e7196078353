//! Saving and restoring controller state through a [`GaugeStore`].

use crate::access::AccessControl;
use crate::collaborators::TokenCustody;
use crate::controller::GaugeController;
use crate::error::GaugeError;
use gauge_store::{GaugeStore, LedgerKind};
use gauge_twab::Account;
use gauge_types::Address;
use std::collections::HashMap;

const ACCESS_KEY: &[u8] = b"access";
const FREE_BALANCES_KEY: &[u8] = b"free_balances";
const COMMITTED_BALANCES_KEY: &[u8] = b"committed_balances";

impl<T: TokenCustody> GaugeController<T> {
    /// Persist roles, balances and every gauge ledger.
    ///
    /// The token and the reward collaborator are not part of the saved state.
    pub fn save_to_store(&self, store: &dyn GaugeStore) -> Result<(), GaugeError> {
        store.put_meta(ACCESS_KEY, &encode(&self.access)?)?;

        let free: Vec<(Address, u128)> = self.balances.iter().map(|(a, b)| (*a, *b)).collect();
        store.put_meta(FREE_BALANCES_KEY, &encode(&free)?)?;

        let committed: Vec<(Address, Address, u128)> = self
            .user_gauge_balances
            .iter()
            .map(|((gauge, user), amount)| (*gauge, *user, *amount))
            .collect();
        store.put_meta(COMMITTED_BALANCES_KEY, &encode(&committed)?)?;

        for (gauge, account) in &self.stake_ledgers {
            store.put_ledger(LedgerKind::Stake, gauge, &encode(account)?)?;
        }
        for (gauge, account) in &self.scale_ledgers {
            store.put_ledger(LedgerKind::Scale, gauge, &encode(account)?)?;
        }
        tracing::debug!(
            gauges = self.scale_ledgers.len(),
            users = self.balances.len(),
            "controller state saved"
        );
        Ok(())
    }

    /// Replace roles, balances and ledgers with what `store` holds.
    ///
    /// Every record is decoded and checked before anything is replaced, so a
    /// corrupt store leaves the controller as it was. Missing keys load as
    /// empty state; missing roles keep the current ones.
    pub fn load_state_from_store(&mut self, store: &dyn GaugeStore) -> Result<(), GaugeError> {
        let access: Option<AccessControl> = match store.get_meta(ACCESS_KEY)? {
            Some(bytes) => Some(decode(&bytes)?),
            None => None,
        };
        if let Some(access) = &access {
            if access.owner().is_zero() {
                return Err(GaugeError::Corrupt("zero owner".into()));
            }
        }

        let free: Vec<(Address, u128)> = match store.get_meta(FREE_BALANCES_KEY)? {
            Some(bytes) => decode(&bytes)?,
            None => Vec::new(),
        };
        let committed: Vec<(Address, Address, u128)> = match store.get_meta(COMMITTED_BALANCES_KEY)? {
            Some(bytes) => decode(&bytes)?,
            None => Vec::new(),
        };

        let stake_ledgers = load_ledgers(store, LedgerKind::Stake)?;
        let scale_ledgers = load_ledgers(store, LedgerKind::Scale)?;

        // Committed balances must add up to each gauge's live stake.
        let mut staked: HashMap<Address, u128> = HashMap::new();
        for (gauge, _, amount) in &committed {
            let total = staked.entry(*gauge).or_insert(0);
            *total = total
                .checked_add(*amount)
                .ok_or_else(|| GaugeError::Corrupt(format!("committed stake on {gauge} overflows")))?;
        }
        for (gauge, account) in &stake_ledgers {
            let expected = staked.get(gauge).copied().unwrap_or(0);
            if account.balance() != expected {
                return Err(GaugeError::Corrupt(format!(
                    "gauge {gauge} stake {} does not match committed total {expected}",
                    account.balance()
                )));
            }
        }
        if let Some(gauge) = staked
            .iter()
            .find(|(gauge, total)| **total > 0 && !stake_ledgers.contains_key(*gauge))
            .map(|(gauge, _)| *gauge)
        {
            return Err(GaugeError::Corrupt(format!("gauge {gauge} has stake but no ledger")));
        }

        if let Some(access) = access {
            self.access = access;
        }
        self.balances = free.into_iter().collect();
        self.user_gauge_balances = committed
            .into_iter()
            .map(|(gauge, user, amount)| ((gauge, user), amount))
            .collect();
        self.stake_ledgers = stake_ledgers;
        self.scale_ledgers = scale_ledgers;
        tracing::info!(
            gauges = self.scale_ledgers.len(),
            users = self.balances.len(),
            "controller state loaded"
        );
        Ok(())
    }
}

fn load_ledgers(
    store: &dyn GaugeStore,
    kind: LedgerKind,
) -> Result<HashMap<Address, Account>, GaugeError> {
    let mut ledgers = HashMap::new();
    for (gauge, bytes) in store.iter_ledgers(kind)? {
        let account: Account = decode(&bytes)?;
        if !account.is_consistent() {
            return Err(GaugeError::Corrupt(format!("{kind} ledger of {gauge} is inconsistent")));
        }
        ledgers.insert(gauge, account);
    }
    Ok(ledgers)
}

fn encode<V: serde::Serialize>(value: &V) -> Result<Vec<u8>, GaugeError> {
    bincode::serialize(value).map_err(|e| GaugeError::Serialization(e.to_string()))
}

fn decode<V: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<V, GaugeError> {
    bincode::deserialize(bytes).map_err(|e| GaugeError::Serialization(e.to_string()))
}
