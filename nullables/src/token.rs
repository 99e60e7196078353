//! Nullable token: records every transfer the controller makes.

use gauge_controller::{GaugeError, TokenCustody};
use gauge_types::Address;
use std::cell::RefCell;
use std::rc::Rc;

/// One call into the token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    From { from: Address, to: Address, amount: u128 },
    Out { from: Address, to: Address, amount: u128 },
}

#[derive(Default)]
struct TokenState {
    transfers: Vec<Transfer>,
    fail_next: bool,
}

/// A token with unlimited balances that logs transfers.
///
/// Clones share one log, so a test can keep a handle after moving the token
/// into a controller.
#[derive(Clone)]
pub struct NullToken {
    address: Address,
    state: Rc<RefCell<TokenState>>,
}

impl NullToken {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            state: Rc::default(),
        }
    }

    /// Make the next transfer fail.
    pub fn fail_next(&self) {
        self.state.borrow_mut().fail_next = true;
    }

    pub fn transfers(&self) -> Vec<Transfer> {
        self.state.borrow().transfers.clone()
    }

    fn record(&self, transfer: Transfer) -> Result<(), GaugeError> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next) {
            return Err(GaugeError::Token("transfer refused".into()));
        }
        state.transfers.push(transfer);
        Ok(())
    }
}

impl TokenCustody for NullToken {
    fn address(&self) -> Address {
        self.address
    }

    fn transfer_from(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), GaugeError> {
        self.record(Transfer::From { from: *from, to: *to, amount })
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), GaugeError> {
        self.record(Transfer::Out { from: *from, to: *to, amount })
    }
}
