//! In-process token ledger.
//!
//! A minimal balance table that satisfies [`TokenCustody`]. The CLI simulator
//! uses it as the staked token; production deployments plug in their own
//! custody implementation.

use crate::collaborators::TokenCustody;
use crate::error::GaugeError;
use gauge_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerToken {
    address: Address,
    balances: HashMap<Address, u128>,
}

impl LedgerToken {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balances: HashMap::new(),
        }
    }

    pub fn balance_of(&self, holder: &Address) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    /// Create `amount` new tokens for `to`.
    pub fn mint(&mut self, to: &Address, amount: u128) -> Result<(), GaugeError> {
        let balance = self.balances.entry(*to).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(GaugeError::Overflow)?;
        Ok(())
    }

    fn move_balance(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), GaugeError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(GaugeError::Token(format!(
                "{from} holds {available}, cannot move {amount}"
            )));
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(GaugeError::Overflow)?;
        self.balances.insert(*from, available - amount);
        self.balances.insert(*to, credited);
        Ok(())
    }
}

impl TokenCustody for LedgerToken {
    fn address(&self) -> Address {
        self.address
    }

    fn transfer_from(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), GaugeError> {
        self.move_balance(from, to, amount)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), GaugeError> {
        self.move_balance(from, to, amount)
    }
}
