//! The gauge controller: free balances, gauge stakes and governance scales.

use crate::access::AccessControl;
use crate::collaborators::{GaugeRewards, TokenCustody};
use crate::config::GaugeConfig;
use crate::error::GaugeError;
use gauge_twab::{Account, TwabError};
use gauge_types::{checked_mul_fixed, Address, Timestamp};
use std::collections::HashMap;

pub const WITHDRAW_UNDERFLOW: &str = "withdraw exceeds free balance";
pub const STAKE_UNDERFLOW: &str = "stake exceeds free balance";
pub const UNSTAKE_UNDERFLOW: &str = "unstake exceeds committed balance";
pub const GAUGE_STAKE_UNDERFLOW: &str = "unstake exceeds gauge stake";
pub const GAUGE_SCALE_UNDERFLOW: &str = "scale decrease exceeds gauge scale";

/// Old and new scale of a [`GaugeController::set_gauge_scale`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleChange {
    pub old: u128,
    pub new: u128,
}

pub struct GaugeController<T: TokenCustody> {
    address: Address,
    token: T,
    pub(crate) access: AccessControl,
    rewards: Option<Box<dyn GaugeRewards>>,
    config: GaugeConfig,
    pub(crate) balances: HashMap<Address, u128>,
    /// Keyed by (gauge, user).
    pub(crate) user_gauge_balances: HashMap<(Address, Address), u128>,
    pub(crate) stake_ledgers: HashMap<Address, Account>,
    pub(crate) scale_ledgers: HashMap<Address, Account>,
}

impl<T: TokenCustody> GaugeController<T> {
    /// `address` is the custody account deposits are pulled into.
    pub fn new(
        address: Address,
        owner: Address,
        token: T,
        config: GaugeConfig,
    ) -> Result<Self, GaugeError> {
        if token.address().is_zero() {
            return Err(GaugeError::ZeroAddress("token"));
        }
        config.validate()?;
        let access = AccessControl::new(owner)?;
        tracing::info!(%address, %owner, token = %token.address(), "gauge controller created");
        Ok(Self {
            address,
            token,
            access,
            rewards: None,
            config,
            balances: HashMap::new(),
            user_gauge_balances: HashMap::new(),
            stake_ledgers: HashMap::new(),
            scale_ledgers: HashMap::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    pub fn manager(&self) -> Option<Address> {
        self.access.manager()
    }

    // ── Roles and collaborators ─────────────────────────────────────────

    pub fn set_manager(&mut self, caller: &Address, manager: Option<Address>) -> Result<(), GaugeError> {
        self.access.set_manager(caller, manager)?;
        tracing::info!(manager = ?self.access.manager(), "manager changed");
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<(), GaugeError> {
        self.access.transfer_ownership(caller, new_owner)?;
        tracing::info!(owner = %new_owner, "ownership transferred");
        Ok(())
    }

    /// Install or clear the reward collaborator. While none is set the stake
    /// hooks are skipped.
    pub fn set_gauge_reward(
        &mut self,
        caller: &Address,
        rewards: Option<Box<dyn GaugeRewards>>,
    ) -> Result<(), GaugeError> {
        self.access.only_manager_or_owner(caller, "set the reward collaborator")?;
        tracing::info!(installed = rewards.is_some(), "reward collaborator changed");
        self.rewards = rewards;
        Ok(())
    }

    pub fn has_gauge_reward(&self) -> bool {
        self.rewards.is_some()
    }

    // ── Free balance ────────────────────────────────────────────────────

    /// Credit `to` with `amount`, then pull the tokens from `caller`.
    pub fn deposit(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<(), GaugeError> {
        let previous = self.balance_of(to);
        let credited = previous.checked_add(amount).ok_or(GaugeError::Overflow)?;
        self.balances.insert(*to, credited);

        if let Err(err) = self.token.transfer_from(caller, &self.address, amount) {
            self.balances.insert(*to, previous);
            tracing::warn!(%caller, %to, amount, error = %err, "deposit rolled back");
            return Err(err);
        }
        tracing::debug!(%caller, %to, amount, "deposit");
        Ok(())
    }

    /// Debit `caller`'s free balance, then pay the tokens out to them.
    pub fn withdraw(&mut self, caller: &Address, amount: u128) -> Result<(), GaugeError> {
        let previous = self.balance_of(caller);
        let debited = previous
            .checked_sub(amount)
            .ok_or(GaugeError::InsufficientBalance {
                message: WITHDRAW_UNDERFLOW,
                requested: amount,
                available: previous,
            })?;
        self.balances.insert(*caller, debited);

        if let Err(err) = self.token.transfer(&self.address, caller, amount) {
            self.balances.insert(*caller, previous);
            tracing::warn!(%caller, amount, error = %err, "withdraw rolled back");
            return Err(err);
        }
        tracing::debug!(%caller, amount, "withdraw");
        Ok(())
    }

    // ── Stake allocation ────────────────────────────────────────────────

    /// Move `amount` of `caller`'s free balance onto `gauge`.
    pub fn increase_gauge(
        &mut self,
        caller: &Address,
        gauge: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), GaugeError> {
        self.require_gauge(gauge)?;

        let free = self.balance_of(caller);
        let free_after = free
            .checked_sub(amount)
            .ok_or(GaugeError::InsufficientBalance {
                message: STAKE_UNDERFLOW,
                requested: amount,
                available: free,
            })?;
        let committed_after = self
            .user_gauge_balance(gauge, caller)
            .checked_add(amount)
            .ok_or(GaugeError::Overflow)?;

        let capacity = self.config.ring_capacity;
        let ledger = self
            .stake_ledgers
            .entry(*gauge)
            .or_insert_with(|| Account::new(capacity));
        let savepoint = ledger.savepoint();
        let update = ledger.increase_balance(amount, now)?;

        if let Some(rewards) = self.rewards.as_mut() {
            if let Err(err) = rewards.after_increase_gauge(gauge, caller, update.previous_balance) {
                if let Some(ledger) = self.stake_ledgers.get_mut(gauge) {
                    ledger.rollback(savepoint);
                }
                tracing::warn!(%gauge, user = %caller, amount, error = %err, "stake rolled back");
                return Err(err);
            }
        }

        self.balances.insert(*caller, free_after);
        self.user_gauge_balances.insert((*gauge, *caller), committed_after);
        tracing::debug!(
            %gauge,
            user = %caller,
            amount,
            gauge_balance = update.new_balance,
            "stake increased"
        );
        Ok(())
    }

    /// Move `amount` of `caller`'s stake on `gauge` back to their free balance.
    pub fn decrease_gauge(
        &mut self,
        caller: &Address,
        gauge: &Address,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), GaugeError> {
        self.require_gauge(gauge)?;

        let free_after = self
            .balance_of(caller)
            .checked_add(amount)
            .ok_or(GaugeError::Overflow)?;
        let committed = self.user_gauge_balance(gauge, caller);
        let committed_after = committed
            .checked_sub(amount)
            .ok_or(GaugeError::InsufficientBalance {
                message: UNSTAKE_UNDERFLOW,
                requested: amount,
                available: committed,
            })?;

        let capacity = self.config.ring_capacity;
        let ledger = self
            .stake_ledgers
            .entry(*gauge)
            .or_insert_with(|| Account::new(capacity));
        let savepoint = ledger.savepoint();
        let update = ledger.decrease_balance(amount, GAUGE_STAKE_UNDERFLOW, now)?;

        if let Some(rewards) = self.rewards.as_mut() {
            if let Err(err) = rewards.after_decrease_gauge(gauge, caller, update.previous_balance) {
                if let Some(ledger) = self.stake_ledgers.get_mut(gauge) {
                    ledger.rollback(savepoint);
                }
                tracing::warn!(%gauge, user = %caller, amount, error = %err, "unstake rolled back");
                return Err(err);
            }
        }

        self.balances.insert(*caller, free_after);
        if committed_after == 0 {
            self.user_gauge_balances.remove(&(*gauge, *caller));
        } else {
            self.user_gauge_balances.insert((*gauge, *caller), committed_after);
        }
        tracing::debug!(
            %gauge,
            user = %caller,
            amount,
            gauge_balance = update.new_balance,
            "stake decreased"
        );
        Ok(())
    }

    // ── Gauge registry ──────────────────────────────────────────────────

    /// Register `gauge` with the configured default scale.
    pub fn add_gauge(&mut self, caller: &Address, gauge: &Address, now: Timestamp) -> Result<(), GaugeError> {
        let scale = u128::from(self.config.default_scale);
        self.add_gauge_with_scale(caller, gauge, scale, now)
    }

    /// Raise `gauge`'s scale by `scale`. Adding an existing gauge stacks.
    pub fn add_gauge_with_scale(
        &mut self,
        caller: &Address,
        gauge: &Address,
        scale: u128,
        now: Timestamp,
    ) -> Result<(), GaugeError> {
        self.access.only_owner(caller, "add a gauge")?;
        let update = self.scale_ledger_entry(gauge).increase_balance(scale, now)?;
        tracing::info!(%gauge, scale = update.new_balance, "gauge added");
        Ok(())
    }

    /// Drop `gauge`'s scale to zero. History before `now` is kept.
    pub fn remove_gauge(&mut self, caller: &Address, gauge: &Address, now: Timestamp) -> Result<(), GaugeError> {
        self.access.only_owner(caller, "remove a gauge")?;
        let ledger = self.scale_ledger_entry(gauge);
        let current = ledger.balance();
        ledger.decrease_balance(current, GAUGE_SCALE_UNDERFLOW, now)?;
        tracing::info!(%gauge, previous_scale = current, "gauge removed");
        Ok(())
    }

    /// Move `gauge`'s scale to `new_scale`, registering the gauge if it is
    /// unknown or removed. Every call writes a checkpoint, an unchanged scale
    /// included.
    pub fn set_gauge_scale(
        &mut self,
        caller: &Address,
        gauge: &Address,
        new_scale: u128,
        now: Timestamp,
    ) -> Result<ScaleChange, GaugeError> {
        self.access.only_manager_or_owner(caller, "set a gauge scale")?;

        let ledger = self.scale_ledger_entry(gauge);
        let old = ledger.balance();
        if new_scale < old {
            ledger.decrease_balance(old - new_scale, GAUGE_SCALE_UNDERFLOW, now)?;
        } else {
            ledger.increase_balance(new_scale - old, now)?;
        }
        tracing::info!(%gauge, old, new = new_scale, "gauge scale set");
        Ok(ScaleChange { old, new: new_scale })
    }

    fn scale_ledger_entry(&mut self, gauge: &Address) -> &mut Account {
        let capacity = self.config.ring_capacity;
        self.scale_ledgers
            .entry(*gauge)
            .or_insert_with(|| Account::new(capacity))
    }

    fn require_gauge(&self, gauge: &Address) -> Result<(), GaugeError> {
        if self.is_gauge(gauge) {
            Ok(())
        } else {
            Err(GaugeError::InvalidGauge(*gauge))
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// A gauge exists while its scale is nonzero.
    pub fn is_gauge(&self, gauge: &Address) -> bool {
        self.gauge_scale_balance(gauge) > 0
    }

    pub fn balance_of(&self, user: &Address) -> u128 {
        self.balances.get(user).copied().unwrap_or(0)
    }

    pub fn user_gauge_balance(&self, gauge: &Address, user: &Address) -> u128 {
        self.user_gauge_balances
            .get(&(*gauge, *user))
            .copied()
            .unwrap_or(0)
    }

    pub fn gauge_balance(&self, gauge: &Address) -> u128 {
        self.stake_ledgers.get(gauge).map_or(0, Account::balance)
    }

    pub fn gauge_scale_balance(&self, gauge: &Address) -> u128 {
        self.scale_ledgers.get(gauge).map_or(0, Account::balance)
    }

    pub fn gauge_balance_at(&self, gauge: &Address, target: Timestamp, now: Timestamp) -> u128 {
        self.stake_ledgers
            .get(gauge)
            .map_or(0, |ledger| ledger.balance_at(target, now))
    }

    pub fn gauge_scale_at(&self, gauge: &Address, target: Timestamp, now: Timestamp) -> u128 {
        self.scale_ledgers
            .get(gauge)
            .map_or(0, |ledger| ledger.balance_at(target, now))
    }

    /// Average stake on `gauge` over `[start, end)`.
    ///
    /// Time before the gauge's first stake checkpoint counts at that
    /// checkpoint's balance. Seed the gauge with a zero stake when it is
    /// added if rewards must not accrue before the first real deposit.
    pub fn average_gauge_balance_between(
        &self,
        gauge: &Address,
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    ) -> Result<u128, GaugeError> {
        average_between(self.stake_ledgers.get(gauge), start, end, now)
    }

    pub fn average_gauge_scale_between(
        &self,
        gauge: &Address,
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    ) -> Result<u128, GaugeError> {
        average_between(self.scale_ledgers.get(gauge), start, end, now)
    }

    /// Average stake weighted by average scale over the same window.
    ///
    /// This is the product of the two averages, not the average of the
    /// product; reward distributors rely on that.
    pub fn scaled_average_gauge_balance_between(
        &self,
        gauge: &Address,
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    ) -> Result<u128, GaugeError> {
        let stake = self.average_gauge_balance_between(gauge, start, end, now)?;
        let scale = self.average_gauge_scale_between(gauge, start, end, now)?;
        checked_mul_fixed(stake, scale).ok_or(GaugeError::Overflow)
    }

    pub fn stake_ledger(&self, gauge: &Address) -> Option<&Account> {
        self.stake_ledgers.get(gauge)
    }

    pub fn scale_ledger(&self, gauge: &Address) -> Option<&Account> {
        self.scale_ledgers.get(gauge)
    }
}

fn average_between(
    ledger: Option<&Account>,
    start: Timestamp,
    end: Timestamp,
    now: Timestamp,
) -> Result<u128, GaugeError> {
    match ledger {
        Some(ledger) => Ok(ledger.average_balance_between(start, end, now)?),
        None if start > end => Err(TwabError::InvalidRange { start, end }.into()),
        None => Ok(0),
    }
}
