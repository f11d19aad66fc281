//! Daily price bar representation.

use chrono::NaiveDate;

/// One day of trading for a single instrument. Immutable once fetched;
/// evaluation expects bars sorted ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}
