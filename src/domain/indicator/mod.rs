//! Indicator math over close-price series.

pub mod ema;
pub mod macd;

pub use ema::ewm_mean;
pub use macd::{
    compute_macd, MacdParams, MacdRow, DEFAULT_FAST_SPAN, DEFAULT_SIGNAL_SPAN, DEFAULT_SLOW_SPAN,
};
