//! End-to-end evaluation: indicators, crossovers, then the trade walk.

use chrono::NaiveDate;

use crate::domain::crossover::{detect_transitions, SignalRow};
use crate::domain::error::MacdEvalError;
use crate::domain::indicator::{compute_macd, MacdParams};
use crate::domain::ohlcv::PriceBar;
use crate::domain::simulator::{simulate, SimulationConfig, SimulationReport};

/// A single bar has no prior day to diff against, so the crossover series
/// needs at least two.
pub const MIN_PRICE_BARS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationParams {
    /// Only rows strictly after this date are simulated.
    pub start_date: NaiveDate,
    pub macd: MacdParams,
    pub sim: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The simulated window, ready for charting.
    pub rows: Vec<SignalRow>,
    pub report: SimulationReport,
}

/// Run one full evaluation over a fetched price history.
///
/// Indicators and crossovers are derived over the entire history before the
/// start-date filter is applied, so the first retained row still carries a
/// transition diffed against the day preceding the window. Every invocation
/// builds fresh state; nothing is cached between runs.
pub fn run_evaluation(
    bars: &[PriceBar],
    params: &EvaluationParams,
) -> Result<Evaluation, MacdEvalError> {
    if bars.len() < MIN_PRICE_BARS {
        return Err(MacdEvalError::InsufficientData {
            bars: bars.len(),
            minimum: MIN_PRICE_BARS,
        });
    }

    let macd_rows = compute_macd(bars, &params.macd);
    if macd_rows.is_empty() {
        return Err(MacdEvalError::InvalidParameter {
            name: "macd spans".into(),
            reason: "every span must be at least 1".into(),
        });
    }

    let rows: Vec<SignalRow> = detect_transitions(&macd_rows)
        .into_iter()
        .filter(|row| row.date > params.start_date)
        .collect();
    if rows.is_empty() {
        return Err(MacdEvalError::EmptyWindow {
            start: params.start_date,
        });
    }

    let report = simulate(&rows, &params.sim)?;

    Ok(Evaluation { rows, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crossover::Transition;

    fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
            })
            .collect()
    }

    fn params(start: NaiveDate) -> EvaluationParams {
        EvaluationParams {
            start_date: start,
            macd: MacdParams::default(),
            sim: SimulationConfig {
                initial_cash: 1000.0,
                max_buy: 1,
                max_sell: 1,
            },
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_fewer_than_two_bars() {
        let bars = bars_from_closes(&[100.0]);
        let err = run_evaluation(&bars, &params(date(2023, 12, 31))).unwrap_err();
        assert!(matches!(
            err,
            MacdEvalError::InsufficientData { bars: 1, minimum: 2 }
        ));
    }

    #[test]
    fn constant_closes_trade_nothing() {
        let bars = bars_from_closes(&[100.0; 30]);
        let evaluation = run_evaluation(&bars, &params(date(2023, 12, 31))).unwrap();

        assert!(evaluation.report.buys.is_empty());
        assert!(evaluation.report.sells.is_empty());
        assert!(evaluation.report.actions.is_empty());
        assert_eq!(evaluation.report.total_gain, 0.0);
        assert!(evaluation
            .rows
            .iter()
            .all(|r| r.transition == Transition::Flat));
    }

    #[test]
    fn dip_and_rally_produce_one_round_trip() {
        // Ten flat days, three at 95, four at 105. The slow-minus-fast MACD
        // crosses above its signal on the first dip day (buy at 95) and back
        // below on the first rally day (sell at 105).
        let mut closes = vec![100.0; 10];
        closes.extend([95.0; 3]);
        closes.extend([105.0; 4]);
        let bars = bars_from_closes(&closes);

        let evaluation = run_evaluation(&bars, &params(date(2023, 12, 31))).unwrap();
        let report = &evaluation.report;

        assert_eq!(report.buys.len(), 1);
        assert_eq!(report.buys[0].date, date(2024, 1, 11));
        assert_eq!(report.buys[0].price, 95.0);
        assert_eq!(report.sells.len(), 1);
        assert_eq!(report.sells[0].date, date(2024, 1, 14));
        assert_eq!(report.sells[0].price, 105.0);
        assert_eq!(report.final_state.cash, 1010.0);
        assert_eq!(report.final_state.shares_held, 0);
        assert_eq!(report.total_gain, -10.0);
    }

    #[test]
    fn window_start_keeps_transitions_from_full_history() {
        // Filtering to the day before the dip must keep the buy: the
        // retained first row diffs against the pre-window day.
        let mut closes = vec![100.0; 10];
        closes.extend([95.0; 3]);
        closes.extend([105.0; 4]);
        let bars = bars_from_closes(&closes);

        let evaluation = run_evaluation(&bars, &params(date(2024, 1, 10))).unwrap();

        assert_eq!(evaluation.rows[0].date, date(2024, 1, 11));
        assert_eq!(evaluation.rows[0].transition, Transition::Up);
        assert_eq!(evaluation.report.buys.len(), 1);
        assert_eq!(evaluation.report.buys[0].price, 95.0);
    }

    #[test]
    fn start_filter_is_strictly_after() {
        let bars = bars_from_closes(&[100.0; 5]);
        let evaluation = run_evaluation(&bars, &params(date(2024, 1, 3))).unwrap();
        assert_eq!(evaluation.rows.len(), 2);
        assert_eq!(evaluation.rows[0].date, date(2024, 1, 4));
    }

    #[test]
    fn rejects_window_past_all_data() {
        let bars = bars_from_closes(&[100.0; 5]);
        let err = run_evaluation(&bars, &params(date(2024, 2, 1))).unwrap_err();
        assert!(matches!(err, MacdEvalError::EmptyWindow { .. }));
    }

    #[test]
    fn rejects_unordered_bars() {
        let mut bars = bars_from_closes(&[100.0; 10]);
        bars.reverse();
        let err = run_evaluation(&bars, &params(date(2023, 12, 31))).unwrap_err();
        assert!(matches!(err, MacdEvalError::OutOfOrderRows { .. }));
    }

    #[test]
    fn zero_span_is_an_invalid_parameter() {
        let bars = bars_from_closes(&[100.0; 10]);
        let mut p = params(date(2023, 12, 31));
        p.macd.signal_span = 0;
        let err = run_evaluation(&bars, &p).unwrap_err();
        assert!(matches!(err, MacdEvalError::InvalidParameter { .. }));
    }
}
