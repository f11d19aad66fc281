//! MACD and signal line derivation.
//!
//! The MACD line here is the slow EMA minus the fast EMA; the signal line is
//! an EMA of the MACD line. Downstream crossover logic assumes this
//! orientation, so a buy signal fires when momentum turns downward.
//! Default spans follow the 12/26/9 convention.

use chrono::NaiveDate;

use crate::domain::indicator::ema::ewm_mean;
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_FAST_SPAN: usize = 12;
pub const DEFAULT_SLOW_SPAN: usize = 26;
pub const DEFAULT_SIGNAL_SPAN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacdParams {
    pub fast_span: usize,
    pub slow_span: usize,
    pub signal_span: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        MacdParams {
            fast_span: DEFAULT_FAST_SPAN,
            slow_span: DEFAULT_SLOW_SPAN,
            signal_span: DEFAULT_SIGNAL_SPAN,
        }
    }
}

/// One price bar extended with its derived indicator values.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdRow {
    pub date: NaiveDate,
    pub close: f64,
    pub ma_fast: f64,
    pub ma_slow: f64,
    pub macd: f64,
    pub signal: f64,
}

/// Derive MACD rows from a chronological bar sequence. Returns an empty
/// vector for empty input or a zero span.
pub fn compute_macd(bars: &[PriceBar], params: &MacdParams) -> Vec<MacdRow> {
    if bars.is_empty()
        || params.fast_span == 0
        || params.slow_span == 0
        || params.signal_span == 0
    {
        return Vec::new();
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ma_fast = ewm_mean(&closes, params.fast_span);
    let ma_slow = ewm_mean(&closes, params.slow_span);

    let macd: Vec<f64> = ma_slow
        .iter()
        .zip(&ma_fast)
        .map(|(slow, fast)| slow - fast)
        .collect();
    let signal = ewm_mean(&macd, params.signal_span);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| MacdRow {
            date: bar.date,
            close: bar.close,
            ma_fast: ma_fast[i],
            ma_slow: ma_slow[i],
            macd: macd[i],
            signal: signal[i],
        })
        .collect()
}
