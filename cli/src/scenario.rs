//! JSON scenarios: a list of timed actions and queries replayed against a
//! fresh controller, or one restored from a state directory.
//!
//! ```json
//! {
//!   "owner": "0x0000000000000000000000000000000000000001",
//!   "steps": [
//!     { "at": 0,  "do": { "mint": { "to": "0x..0a", "amount": 1000 } } },
//!     { "at": 0,  "do": { "add_gauge": { "caller": "0x..01", "gauge": "0x..64" } } },
//!     { "at": 30, "do": { "average_gauge_balance_between": { "gauge": "0x..64", "start": 0, "end": 20 } } }
//!   ]
//! }
//! ```
//!
//! Queries produce a result entry; actions produce one only when they fail.

use anyhow::Context;
use gauge_controller::{GaugeConfig, GaugeController, GaugeError, LedgerToken};
use gauge_types::{Address, Timestamp, TypesError};
use serde::{Deserialize, Serialize};

const DEFAULT_CONTROLLER: u64 = 0xc0;
const DEFAULT_TOKEN: u64 = 0x70;

/// A hex address in scenario JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Hex(pub Address);

impl TryFrom<String> for Hex {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse().map(Hex)
    }
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub owner: Hex,
    #[serde(default)]
    pub controller: Option<Hex>,
    #[serde(default)]
    pub token: Option<Hex>,
    pub steps: Vec<TimedStep>,
}

#[derive(Debug, Deserialize)]
pub struct TimedStep {
    pub at: u32,
    #[serde(rename = "do")]
    pub step: Step,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    // actions
    Mint { to: Hex, amount: u128 },
    Deposit { caller: Hex, to: Hex, amount: u128 },
    Withdraw { caller: Hex, amount: u128 },
    IncreaseGauge { caller: Hex, gauge: Hex, amount: u128 },
    DecreaseGauge { caller: Hex, gauge: Hex, amount: u128 },
    AddGauge { caller: Hex, gauge: Hex, #[serde(default)] scale: Option<u128> },
    RemoveGauge { caller: Hex, gauge: Hex },
    SetGaugeScale { caller: Hex, gauge: Hex, scale: u128 },
    SetManager { caller: Hex, #[serde(default)] manager: Option<Hex> },
    TransferOwnership { caller: Hex, new_owner: Hex },

    // queries
    IsGauge { gauge: Hex },
    BalanceOf { user: Hex },
    TokenBalance { holder: Hex },
    UserGaugeBalance { gauge: Hex, user: Hex },
    GaugeBalance { gauge: Hex },
    GaugeScaleBalance { gauge: Hex },
    GaugeBalanceAt { gauge: Hex, target: u32 },
    GaugeScaleAt { gauge: Hex, target: u32 },
    AverageGaugeBalanceBetween { gauge: Hex, start: u32, end: u32 },
    AverageGaugeScaleBetween { gauge: Hex, start: u32, end: u32 },
    ScaledAverageGaugeBalanceBetween { gauge: Hex, start: u32, end: u32 },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "mint",
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::IncreaseGauge { .. } => "increase_gauge",
            Self::DecreaseGauge { .. } => "decrease_gauge",
            Self::AddGauge { .. } => "add_gauge",
            Self::RemoveGauge { .. } => "remove_gauge",
            Self::SetGaugeScale { .. } => "set_gauge_scale",
            Self::SetManager { .. } => "set_manager",
            Self::TransferOwnership { .. } => "transfer_ownership",
            Self::IsGauge { .. } => "is_gauge",
            Self::BalanceOf { .. } => "balance_of",
            Self::TokenBalance { .. } => "token_balance",
            Self::UserGaugeBalance { .. } => "user_gauge_balance",
            Self::GaugeBalance { .. } => "gauge_balance",
            Self::GaugeScaleBalance { .. } => "gauge_scale_balance",
            Self::GaugeBalanceAt { .. } => "gauge_balance_at",
            Self::GaugeScaleAt { .. } => "gauge_scale_at",
            Self::AverageGaugeBalanceBetween { .. } => "average_gauge_balance_between",
            Self::AverageGaugeScaleBetween { .. } => "average_gauge_scale_between",
            Self::ScaledAverageGaugeBalanceBetween { .. } => "scaled_average_gauge_balance_between",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Amount(u128),
    Flag(bool),
}

/// One line of scenario output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub step: usize,
    pub at: u32,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn parse(json: &str) -> anyhow::Result<Scenario> {
    serde_json::from_str(json).context("parsing scenario")
}

/// The controller a scenario starts from, before any saved state is loaded.
pub fn build(scenario: &Scenario, config: GaugeConfig) -> anyhow::Result<GaugeController<LedgerToken>> {
    let controller_address = scenario
        .controller
        .map_or_else(|| Address::from_low_u64(DEFAULT_CONTROLLER), |h| h.0);
    let token_address = scenario
        .token
        .map_or_else(|| Address::from_low_u64(DEFAULT_TOKEN), |h| h.0);
    GaugeController::new(
        controller_address,
        scenario.owner.0,
        LedgerToken::new(token_address),
        config,
    )
    .context("creating controller")
}

/// Apply every step of `scenario` to `controller` and collect the results.
pub fn replay(controller: &mut GaugeController<LedgerToken>, scenario: &Scenario) -> Vec<Outcome> {
    let mut outcomes = Vec::new();
    for (index, timed) in scenario.steps.iter().enumerate() {
        let now = Timestamp::new(timed.at);
        let op = timed.step.name();
        let result = apply(controller, &timed.step, now);
        match result {
            Ok(None) => {}
            Ok(Some(value)) => outcomes.push(Outcome {
                step: index,
                at: timed.at,
                op,
                value: Some(value),
                error: None,
            }),
            Err(err) => {
                tracing::info!(step = index, op, error = %err, "scenario step failed");
                outcomes.push(Outcome {
                    step: index,
                    at: timed.at,
                    op,
                    value: None,
                    error: Some(err.to_string()),
                });
            }
        }
    }
    tracing::debug!(steps = scenario.steps.len(), results = outcomes.len(), "scenario replayed");
    outcomes
}

fn apply(
    c: &mut GaugeController<LedgerToken>,
    step: &Step,
    now: Timestamp,
) -> Result<Option<Value>, GaugeError> {
    use Value::{Amount, Flag};

    let value = match *step {
        Step::Mint { to, amount } => {
            c.token_mut().mint(&to.0, amount)?;
            None
        }
        Step::Deposit { caller, to, amount } => {
            c.deposit(&caller.0, &to.0, amount)?;
            None
        }
        Step::Withdraw { caller, amount } => {
            c.withdraw(&caller.0, amount)?;
            None
        }
        Step::IncreaseGauge { caller, gauge, amount } => {
            c.increase_gauge(&caller.0, &gauge.0, amount, now)?;
            None
        }
        Step::DecreaseGauge { caller, gauge, amount } => {
            c.decrease_gauge(&caller.0, &gauge.0, amount, now)?;
            None
        }
        Step::AddGauge { caller, gauge, scale } => {
            match scale {
                Some(scale) => c.add_gauge_with_scale(&caller.0, &gauge.0, scale, now)?,
                None => c.add_gauge(&caller.0, &gauge.0, now)?,
            }
            None
        }
        Step::RemoveGauge { caller, gauge } => {
            c.remove_gauge(&caller.0, &gauge.0, now)?;
            None
        }
        Step::SetGaugeScale { caller, gauge, scale } => {
            c.set_gauge_scale(&caller.0, &gauge.0, scale, now)?;
            None
        }
        Step::SetManager { caller, manager } => {
            c.set_manager(&caller.0, manager.map(|m| m.0))?;
            None
        }
        Step::TransferOwnership { caller, new_owner } => {
            c.transfer_ownership(&caller.0, new_owner.0)?;
            None
        }
        Step::IsGauge { gauge } => Some(Flag(c.is_gauge(&gauge.0))),
        Step::BalanceOf { user } => Some(Amount(c.balance_of(&user.0))),
        Step::TokenBalance { holder } => Some(Amount(c.token().balance_of(&holder.0))),
        Step::UserGaugeBalance { gauge, user } => {
            Some(Amount(c.user_gauge_balance(&gauge.0, &user.0)))
        }
        Step::GaugeBalance { gauge } => Some(Amount(c.gauge_balance(&gauge.0))),
        Step::GaugeScaleBalance { gauge } => Some(Amount(c.gauge_scale_balance(&gauge.0))),
        Step::GaugeBalanceAt { gauge, target } => {
            Some(Amount(c.gauge_balance_at(&gauge.0, Timestamp::new(target), now)))
        }
        Step::GaugeScaleAt { gauge, target } => {
            Some(Amount(c.gauge_scale_at(&gauge.0, Timestamp::new(target), now)))
        }
        Step::AverageGaugeBalanceBetween { gauge, start, end } => Some(Amount(
            c.average_gauge_balance_between(&gauge.0, Timestamp::new(start), Timestamp::new(end), now)?,
        )),
        Step::AverageGaugeScaleBetween { gauge, start, end } => Some(Amount(
            c.average_gauge_scale_between(&gauge.0, Timestamp::new(start), Timestamp::new(end), now)?,
        )),
        Step::ScaledAverageGaugeBalanceBetween { gauge, start, end } => Some(Amount(
            c.scaled_average_gauge_balance_between(
                &gauge.0,
                Timestamp::new(start),
                Timestamp::new(end),
                now,
            )?,
        )),
    };
    Ok(value)
}
