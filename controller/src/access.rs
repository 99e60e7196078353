//! Owner and manager roles.

use crate::error::GaugeError;
use gauge_types::Address;
use serde::{Deserialize, Serialize};

/// Two-role access control: the owner may do everything, the manager only
/// the operations gated by [`AccessControl::only_manager_or_owner`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: Address,
    manager: Option<Address>,
}

impl AccessControl {
    pub fn new(owner: Address) -> Result<Self, GaugeError> {
        if owner.is_zero() {
            return Err(GaugeError::ZeroAddress("owner"));
        }
        Ok(Self {
            owner,
            manager: None,
        })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn manager(&self) -> Option<Address> {
        self.manager
    }

    pub fn only_owner(&self, caller: &Address, action: &'static str) -> Result<(), GaugeError> {
        if *caller == self.owner {
            Ok(())
        } else {
            tracing::warn!(%caller, action, "rejected non-owner call");
            Err(GaugeError::Unauthorized {
                caller: *caller,
                action,
            })
        }
    }

    pub fn only_manager_or_owner(
        &self,
        caller: &Address,
        action: &'static str,
    ) -> Result<(), GaugeError> {
        if *caller == self.owner || self.manager == Some(*caller) {
            Ok(())
        } else {
            tracing::warn!(%caller, action, "rejected call from neither manager nor owner");
            Err(GaugeError::Unauthorized {
                caller: *caller,
                action,
            })
        }
    }

    /// Replace the manager. Owner only; `None` clears the role.
    pub fn set_manager(&mut self, caller: &Address, manager: Option<Address>) -> Result<(), GaugeError> {
        self.only_owner(caller, "set the manager")?;
        self.manager = manager.filter(|m| !m.is_zero());
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<(), GaugeError> {
        self.only_owner(caller, "transfer ownership")?;
        if new_owner.is_zero() {
            return Err(GaugeError::ZeroAddress("new owner"));
        }
        self.owner = new_owner;
        Ok(())
    }
}
