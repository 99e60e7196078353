//! Nullable reward distributor: records hook invocations.

use gauge_controller::{GaugeError, GaugeRewards};
use gauge_types::Address;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewardCall {
    Increase { gauge: Address, user: Address, previous_gauge_balance: u128 },
    Decrease { gauge: Address, user: Address, previous_gauge_balance: u128 },
}

#[derive(Default)]
struct RewardState {
    calls: Vec<RewardCall>,
    failing: bool,
}

/// Shared-log reward hooks. Box a clone into the controller, keep the
/// original to inspect calls.
#[derive(Clone, Default)]
pub struct NullRewards {
    state: Rc<RefCell<RewardState>>,
}

impl NullRewards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every hook until turned off again.
    pub fn set_failing(&self, failing: bool) {
        self.state.borrow_mut().failing = failing;
    }

    pub fn calls(&self) -> Vec<RewardCall> {
        self.state.borrow().calls.clone()
    }

    fn record(&self, call: RewardCall) -> Result<(), GaugeError> {
        let mut state = self.state.borrow_mut();
        if state.failing {
            return Err(GaugeError::Rewards("hook refused".into()));
        }
        state.calls.push(call);
        Ok(())
    }
}

impl GaugeRewards for NullRewards {
    fn after_increase_gauge(
        &mut self,
        gauge: &Address,
        user: &Address,
        previous_gauge_balance: u128,
    ) -> Result<(), GaugeError> {
        self.record(RewardCall::Increase {
            gauge: *gauge,
            user: *user,
            previous_gauge_balance,
        })
    }

    fn after_decrease_gauge(
        &mut self,
        gauge: &Address,
        user: &Address,
        previous_gauge_balance: u128,
    ) -> Result<(), GaugeError> {
        self.record(RewardCall::Decrease {
            gauge: *gauge,
            user: *user,
            previous_gauge_balance,
        })
    }
}
