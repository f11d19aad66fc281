//! Trade simulation over crossover transitions.
//!
//! A single sequential walk over date-ordered signal rows, carrying a cash
//! balance and a whole-share count. An upward crossover buys up to `max_buy`
//! affordable units, a downward crossover sells up to `max_sell` held units,
//! and both no-op branches (not enough cash, nothing held) are recorded in
//! the action log rather than treated as failures. Days without a crossover
//! leave no trace.
//!
//! The walk is order-dependent: rows must be strictly ascending by date, and
//! out-of-order input is rejected rather than silently mis-simulated.

use chrono::NaiveDate;

use crate::domain::crossover::{SignalRow, Transition};
use crate::domain::error::MacdEvalError;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_cash: f64,
    /// Per-transaction unit cap on buys.
    pub max_buy: u32,
    /// Per-transaction unit cap on sells.
    pub max_sell: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_cash: 50_000.0,
            max_buy: 1,
            max_sell: 1,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), MacdEvalError> {
        if !self.initial_cash.is_finite() || self.initial_cash < 0.0 {
            return Err(MacdEvalError::InvalidParameter {
                name: "initial_cash".into(),
                reason: "must be a finite, non-negative amount".into(),
            });
        }
        if self.max_buy < 1 {
            return Err(MacdEvalError::InvalidParameter {
                name: "max_buy".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.max_sell < 1 {
            return Err(MacdEvalError::InvalidParameter {
                name: "max_sell".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Portfolio state for one run. Owned by the run, never shared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub cash: f64,
    pub shares_held: u64,
}

/// What evaluating a single row did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Bought { units: u64 },
    Sold { units: u64 },
    InsufficientCash,
    NothingToSell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// An executed trade, at most one per row.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    pub date: NaiveDate,
    pub price: f64,
    pub units: u64,
    pub direction: TradeDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub buys: Vec<TradeEvent>,
    pub sells: Vec<TradeEvent>,
    /// Cash spent net of cash recovered: initial cash minus final cash.
    /// Shares still held at the end are not valued here.
    pub total_gain: f64,
    pub actions: Vec<String>,
    pub final_state: SimulationState,
}

/// Apply one signal row to the state.
///
/// Pure: returns the successor state and what happened. `Flat` rows pass the
/// state through with no event.
pub fn step(
    state: SimulationState,
    row: &SignalRow,
    config: &SimulationConfig,
) -> (SimulationState, Option<StepEvent>) {
    match row.transition {
        Transition::Flat => (state, None),
        Transition::Up => {
            let affordable = (state.cash / row.close).floor() as u64;
            if affordable < 1 {
                return (state, Some(StepEvent::InsufficientCash));
            }
            let units = affordable.min(u64::from(config.max_buy));
            let next = SimulationState {
                cash: state.cash - units as f64 * row.close,
                shares_held: state.shares_held + units,
            };
            (next, Some(StepEvent::Bought { units }))
        }
        Transition::Down => {
            if state.shares_held == 0 {
                return (state, Some(StepEvent::NothingToSell));
            }
            let units = state.shares_held.min(u64::from(config.max_sell));
            let next = SimulationState {
                cash: state.cash + units as f64 * row.close,
                shares_held: state.shares_held - units,
            };
            (next, Some(StepEvent::Sold { units }))
        }
    }
}

/// Walk the rows in order and produce the full report.
pub fn simulate(
    rows: &[SignalRow],
    config: &SimulationConfig,
) -> Result<SimulationReport, MacdEvalError> {
    config.validate()?;

    if rows.is_empty() {
        return Err(MacdEvalError::InsufficientData {
            bars: 0,
            minimum: 1,
        });
    }
    for pair in rows.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(MacdEvalError::OutOfOrderRows {
                prev: pair[0].date,
                next: pair[1].date,
            });
        }
    }
    if let Some(row) = rows.iter().find(|r| !r.close.is_finite() || r.close <= 0.0) {
        return Err(MacdEvalError::MalformedPayload {
            reason: format!("non-positive close {} on {}", row.close, row.date),
        });
    }

    let mut state = SimulationState {
        cash: config.initial_cash,
        shares_held: 0,
    };
    let mut buys = Vec::new();
    let mut sells = Vec::new();
    let mut actions = Vec::new();

    for row in rows {
        let (next, event) = step(state, row, config);
        match event {
            Some(StepEvent::Bought { units }) => {
                actions.push(format!(
                    "{}: bought {} unit(s) at {:.2}, balance {:.2}",
                    row.date, units, row.close, next.cash
                ));
                buys.push(TradeEvent {
                    date: row.date,
                    price: row.close,
                    units,
                    direction: TradeDirection::Buy,
                });
            }
            Some(StepEvent::Sold { units }) => {
                actions.push(format!(
                    "{}: sold {} unit(s) at {:.2}, balance {:.2}",
                    row.date, units, row.close, next.cash
                ));
                sells.push(TradeEvent {
                    date: row.date,
                    price: row.close,
                    units,
                    direction: TradeDirection::Sell,
                });
            }
            Some(StepEvent::InsufficientCash) => {
                actions.push(format!(
                    "{}: balance {:.2} cannot cover one unit at {:.2}",
                    row.date, state.cash, row.close
                ));
            }
            Some(StepEvent::NothingToSell) => {
                actions.push(format!("{}: sell signal with no shares held", row.date));
            }
            None => {}
        }
        state = next;
    }

    Ok(SimulationReport {
        buys,
        sells,
        total_gain: config.initial_cash - state.cash,
        actions,
        final_state: state,
    })
}
