//! Capabilities the controller calls out to.
//!
//! Both are invoked synchronously at fixed points inside an operation. An
//! error from either aborts the whole operation and the controller restores
//! its own state before returning.

use crate::error::GaugeError;
use gauge_types::Address;

/// Custody of the staked token.
pub trait TokenCustody {
    /// Address of the token itself.
    fn address(&self) -> Address;

    /// Pull `amount` from `from` into `to` (the controller's custody account).
    fn transfer_from(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), GaugeError>;

    /// Pay `amount` out of `from` (the controller's custody account) to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), GaugeError>;
}

/// Reward distributor notified around stake movements.
///
/// `previous_gauge_balance` is the gauge's stake ledger balance before the
/// operation's delta was applied.
pub trait GaugeRewards {
    fn after_increase_gauge(
        &mut self,
        gauge: &Address,
        user: &Address,
        previous_gauge_balance: u128,
    ) -> Result<(), GaugeError>;

    fn after_decrease_gauge(
        &mut self,
        gauge: &Address,
        user: &Address,
        previous_gauge_balance: u128,
    ) -> Result<(), GaugeError>;
}
