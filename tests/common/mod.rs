#![allow(dead_code)]

use chrono::NaiveDate;
use macdeval::domain::error::MacdEvalError;
pub use macdeval::domain::ohlcv::PriceBar;
use macdeval::ports::catalog_port::{CatalogPort, Instrument};
use macdeval::ports::data_port::PriceDataPort;
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockPricePort {
    fn fetch_daily(&self, code: &str) -> Result<Vec<PriceBar>, MacdEvalError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(MacdEvalError::Fetch {
                code: code.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(code) {
            Some(bars) => Ok(bars.clone()),
            None => Err(MacdEvalError::NoData {
                code: code.to_string(),
            }),
        }
    }
}

pub struct StaticCatalog {
    pub instruments: Vec<Instrument>,
}

impl StaticCatalog {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            instruments: pairs
                .iter()
                .map(|&(name, code)| Instrument {
                    name: name.to_string(),
                    code: code.to_string(),
                })
                .collect(),
        }
    }
}

impl CatalogPort for StaticCatalog {
    fn instruments(&self) -> Result<Vec<Instrument>, MacdEvalError> {
        Ok(self.instruments.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(day: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
    }
}

pub fn bars_from_closes(start: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
        })
        .collect()
}

/// Ten flat days, a three-day dip, a four-day rally. With the slow-minus-fast
/// MACD this buys on the first dip day and sells on the first rally day.
pub fn dip_and_rally_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 10];
    closes.extend([95.0; 3]);
    closes.extend([105.0; 4]);
    closes
}
