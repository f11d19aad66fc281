//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for macdeval.
#[derive(Debug, thiserror::Error)]
pub enum MacdEvalError {
    #[error("fetch failed for {code}: {reason}")]
    Fetch { code: String, reason: String },

    #[error("malformed price data: {reason}")]
    MalformedPayload { reason: String },

    #[error("no price data for {code}")]
    NoData { code: String },

    #[error("insufficient price history: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("price rows out of order: {next} follows {prev}")]
    OutOfOrderRows { prev: NaiveDate, next: NaiveDate },

    #[error("no price rows after {start}")]
    EmptyWindow { start: NaiveDate },

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MacdEvalError> for std::process::ExitCode {
    fn from(err: &MacdEvalError) -> Self {
        let code: u8 = match err {
            MacdEvalError::Io(_) => 1,
            MacdEvalError::ConfigParse { .. }
            | MacdEvalError::ConfigMissing { .. }
            | MacdEvalError::ConfigInvalid { .. } => 2,
            MacdEvalError::Fetch { .. } | MacdEvalError::MalformedPayload { .. } => 3,
            MacdEvalError::InvalidParameter { .. } => 4,
            MacdEvalError::NoData { .. }
            | MacdEvalError::InsufficientData { .. }
            | MacdEvalError::OutOfOrderRows { .. }
            | MacdEvalError::EmptyWindow { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
