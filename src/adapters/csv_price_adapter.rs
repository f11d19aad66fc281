//! CSV price-file adapter.
//!
//! Offline counterpart to the HTTP adapter: one `{code}.csv` per instrument
//! under a base directory, columns `date,open,high,low,close`.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::domain::error::MacdEvalError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::PriceDataPort;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{code}.csv"))
    }
}

fn parse_price(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, MacdEvalError> {
    record
        .get(index)
        .ok_or_else(|| MacdEvalError::MalformedPayload {
            reason: format!("missing {name} column"),
        })?
        .trim()
        .parse()
        .map_err(|e| MacdEvalError::MalformedPayload {
            reason: format!("invalid {name} value: {e}"),
        })
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_daily(&self, code: &str) -> Result<Vec<PriceBar>, MacdEvalError> {
        let path = self.csv_path(code);
        let mut reader = csv::Reader::from_path(&path).map_err(|e| MacdEvalError::Fetch {
            code: code.to_string(),
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        let mut bars = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| MacdEvalError::MalformedPayload {
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = record.get(0).ok_or_else(|| MacdEvalError::MalformedPayload {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                MacdEvalError::MalformedPayload {
                    reason: format!("invalid date {date_str:?}: {e}"),
                }
            })?;

            bars.push(PriceBar {
                date,
                open: parse_price(&record, 1, "open")?,
                high: parse_price(&record, 2, "high")?,
                low: parse_price(&record, 3, "low")?,
                close: parse_price(&record, 4, "close")?,
            });
        }

        if bars.is_empty() {
            return Err(MacdEvalError::NoData {
                code: code.to_string(),
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
