//! Price history access port.

use crate::domain::error::MacdEvalError;
use crate::domain::ohlcv::PriceBar;

pub trait PriceDataPort {
    /// The full available daily history for an instrument, ascending by date.
    fn fetch_daily(&self, code: &str) -> Result<Vec<PriceBar>, MacdEvalError>;
}
