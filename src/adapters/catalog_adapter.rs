//! CSV instrument catalog adapter.
//!
//! A two-column `name,code` file populating the instrument selector.

use std::path::PathBuf;

use crate::domain::error::MacdEvalError;
use crate::ports::catalog_port::{CatalogPort, Instrument};

pub struct CsvCatalogAdapter {
    path: PathBuf,
}

impl CsvCatalogAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CatalogPort for CsvCatalogAdapter {
    fn instruments(&self) -> Result<Vec<Instrument>, MacdEvalError> {
        let mut reader =
            csv::Reader::from_path(&self.path).map_err(|e| MacdEvalError::MalformedPayload {
                reason: format!("failed to open catalog {}: {}", self.path.display(), e),
            })?;

        let mut instruments = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| MacdEvalError::MalformedPayload {
                reason: format!("catalog parse error: {e}"),
            })?;

            let name = record.get(0).unwrap_or("").trim();
            let code = record.get(1).unwrap_or("").trim();
            if name.is_empty() || code.is_empty() {
                continue;
            }

            instruments.push(Instrument {
                name: name.to_string(),
                code: code.to_string(),
            });
        }

        Ok(instruments)
    }
}
