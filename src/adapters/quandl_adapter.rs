//! Quandl-style dataset HTTP adapter.
//!
//! Fetches the full daily history for an instrument from a
//! `datasets/{code}.json` endpoint and maps the column-oriented payload
//! (`column_names` plus row arrays) into price bars. Connect/timeout errors
//! and 429 responses are retried with exponential backoff; everything else
//! surfaces as a fetch error. Payloads arrive newest-first and are sorted
//! ascending before they leave the adapter.

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::error::MacdEvalError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::PriceDataPort;

pub const DEFAULT_BASE_URL: &str = "https://www.quandl.com/api/v3/datasets/BSE";

#[derive(Debug, Deserialize)]
struct DatasetResponse {
    dataset: Dataset,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    column_names: Vec<String>,
    data: Vec<Vec<serde_json::Value>>,
}

pub struct QuandlAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
    max_retries: u32,
    base_delay: Duration,
}

impl QuandlAdapter {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            api_key,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    fn dataset_url(&self, code: &str) -> String {
        match &self.api_key {
            Some(key) => format!("{}/{}.json?api_key={}", self.base_url, code, key),
            None => format!("{}/{}.json", self.base_url, code),
        }
    }

    fn fetch_with_retry(&self, code: &str) -> Result<DatasetResponse, MacdEvalError> {
        let url = self.dataset_url(code);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                std::thread::sleep(self.base_delay * 2u32.pow(attempt - 1));
            }

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(MacdEvalError::NoData {
                            code: code.to_string(),
                        });
                    }
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(MacdEvalError::Fetch {
                            code: code.to_string(),
                            reason: "rate limited (HTTP 429)".into(),
                        });
                        continue;
                    }
                    if !status.is_success() {
                        return Err(MacdEvalError::Fetch {
                            code: code.to_string(),
                            reason: format!("HTTP {status}"),
                        });
                    }

                    return resp.json::<DatasetResponse>().map_err(|e| {
                        MacdEvalError::MalformedPayload {
                            reason: format!("{code}: {e}"),
                        }
                    });
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(MacdEvalError::Fetch {
                            code: code.to_string(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                    return Err(MacdEvalError::Fetch {
                        code: code.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(last_error.unwrap_or_else(|| MacdEvalError::Fetch {
            code: code.to_string(),
            reason: "max retries exceeded".into(),
        }))
    }
}

impl PriceDataPort for QuandlAdapter {
    fn fetch_daily(&self, code: &str) -> Result<Vec<PriceBar>, MacdEvalError> {
        let response = self.fetch_with_retry(code)?;
        parse_dataset(code, response.dataset)
    }
}

fn column_index(columns: &[String], name: &str) -> Result<usize, MacdEvalError> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| MacdEvalError::MalformedPayload {
            reason: format!("missing column {name:?}"),
        })
}

fn cell_f64(row: &[serde_json::Value], index: usize) -> Result<Option<f64>, MacdEvalError> {
    match row.get(index) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| MacdEvalError::MalformedPayload {
                reason: format!("non-numeric price cell: {value}"),
            }),
    }
}

fn parse_dataset(code: &str, dataset: Dataset) -> Result<Vec<PriceBar>, MacdEvalError> {
    let date_col = column_index(&dataset.column_names, "Date")?;
    let open_col = column_index(&dataset.column_names, "Open")?;
    let high_col = column_index(&dataset.column_names, "High")?;
    let low_col = column_index(&dataset.column_names, "Low")?;
    let close_col = column_index(&dataset.column_names, "Close")?;

    let mut bars = Vec::with_capacity(dataset.data.len());

    for row in &dataset.data {
        let date_str = row
            .get(date_col)
            .and_then(|v| v.as_str())
            .ok_or_else(|| MacdEvalError::MalformedPayload {
                reason: "missing date cell".into(),
            })?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            MacdEvalError::MalformedPayload {
                reason: format!("invalid date {date_str:?}: {e}"),
            }
        })?;

        // Thinly traded days carry null price cells; drop the day rather
        // than failing the whole history.
        let (Some(open), Some(high), Some(low), Some(close)) = (
            cell_f64(row, open_col)?,
            cell_f64(row, high_col)?,
            cell_f64(row, low_col)?,
            cell_f64(row, close_col)?,
        ) else {
            continue;
        };

        bars.push(PriceBar {
            date,
            open,
            high,
            low,
            close,
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
