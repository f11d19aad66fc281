//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::catalog_adapter::CsvCatalogAdapter;
use crate::adapters::chart::render_price_chart;
use crate::adapters::csv_price_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::quandl_adapter::{QuandlAdapter, DEFAULT_BASE_URL};
use crate::domain::error::MacdEvalError;
use crate::domain::evaluate::{run_evaluation, EvaluationParams};
use crate::domain::indicator::MacdParams;
use crate::domain::simulator::SimulationConfig;
use crate::ports::catalog_port::CatalogPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;

#[derive(Parser, Debug)]
#[command(name = "macdeval", about = "MACD crossover trade evaluator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate the crossover strategy for one instrument
    Evaluate {
        #[arg(short, long)]
        config: PathBuf,
        /// Instrument code override
        #[arg(long)]
        code: Option<String>,
        /// Start date override (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
        /// Write the chart to this SVG file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List instruments from the catalog
    Instruments {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Evaluate {
            config,
            code,
            start_date,
            output,
        } => run_evaluate(
            &config,
            code.as_deref(),
            start_date.as_deref(),
            output.as_ref(),
        ),
        Command::Instruments { config } => run_instruments(&config),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = MacdEvalError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Resolve the instrument code: CLI override first, then the config file.
pub fn resolve_code(
    code_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, MacdEvalError> {
    if let Some(code) = code_override {
        let code = code.trim().to_uppercase();
        if !code.is_empty() {
            return Ok(code);
        }
    }

    match config.get_string("simulation", "code") {
        Some(code) if !code.trim().is_empty() => Ok(code.trim().to_uppercase()),
        _ => Err(MacdEvalError::ConfigMissing {
            section: "simulation".into(),
            key: "code".into(),
        }),
    }
}

pub fn parse_start_date(value: &str, section: &str) -> Result<NaiveDate, MacdEvalError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| MacdEvalError::ConfigInvalid {
        section: section.into(),
        key: "start_date".into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

pub fn build_start_date(
    override_value: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<NaiveDate, MacdEvalError> {
    if let Some(value) = override_value {
        return parse_start_date(value, "simulation");
    }
    match config.get_string("simulation", "start_date") {
        Some(value) => parse_start_date(&value, "simulation"),
        None => Err(MacdEvalError::ConfigMissing {
            section: "simulation".into(),
            key: "start_date".into(),
        }),
    }
}

fn config_span(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, MacdEvalError> {
    let value = config.get_int("macd", key, default as i64);
    if value < 1 {
        return Err(MacdEvalError::ConfigInvalid {
            section: "macd".into(),
            key: key.into(),
            reason: "span must be at least 1".into(),
        });
    }
    Ok(value as usize)
}

pub fn build_macd_params(config: &dyn ConfigPort) -> Result<MacdParams, MacdEvalError> {
    let defaults = MacdParams::default();
    Ok(MacdParams {
        fast_span: config_span(config, "fast_span", defaults.fast_span)?,
        slow_span: config_span(config, "slow_span", defaults.slow_span)?,
        signal_span: config_span(config, "signal_span", defaults.signal_span)?,
    })
}

fn config_cap(config: &dyn ConfigPort, key: &str) -> Result<u32, MacdEvalError> {
    let value = config.get_int("simulation", key, 1);
    if value < 1 || value > i64::from(u32::MAX) {
        return Err(MacdEvalError::ConfigInvalid {
            section: "simulation".into(),
            key: key.into(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(value as u32)
}

pub fn build_simulation_config(config: &dyn ConfigPort) -> Result<SimulationConfig, MacdEvalError> {
    let initial_cash = config.get_double("simulation", "initial_cash", 50_000.0);
    if !initial_cash.is_finite() || initial_cash < 0.0 {
        return Err(MacdEvalError::ConfigInvalid {
            section: "simulation".into(),
            key: "initial_cash".into(),
            reason: "must be a non-negative amount".into(),
        });
    }

    let sim = SimulationConfig {
        initial_cash,
        max_buy: config_cap(config, "max_buy")?,
        max_sell: config_cap(config, "max_sell")?,
    };
    sim.validate()?;
    Ok(sim)
}

pub fn build_evaluation_params(
    config: &dyn ConfigPort,
    start_date: NaiveDate,
) -> Result<EvaluationParams, MacdEvalError> {
    Ok(EvaluationParams {
        start_date,
        macd: build_macd_params(config)?,
        sim: build_simulation_config(config)?,
    })
}

/// Pick the price source from `[data] source`: `quandl` (default) or `csv`.
pub fn build_data_port(
    config: &dyn ConfigPort,
) -> Result<Box<dyn PriceDataPort + Send + Sync>, MacdEvalError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "quandl".to_string());

    match source.trim().to_lowercase().as_str() {
        "quandl" => {
            let base_url = config
                .get_string("data", "base_url")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            let api_key = config.get_string("data", "api_key");
            Ok(Box::new(QuandlAdapter::new(base_url, api_key)))
        }
        "csv" => {
            let path = config.get_string("data", "csv_path").ok_or_else(|| {
                MacdEvalError::ConfigMissing {
                    section: "data".into(),
                    key: "csv_path".into(),
                }
            })?;
            Ok(Box::new(CsvPriceAdapter::new(PathBuf::from(path))))
        }
        other => Err(MacdEvalError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("unknown source {other:?} (expected quandl or csv)"),
        }),
    }
}

pub fn build_catalog(config: &dyn ConfigPort) -> CsvCatalogAdapter {
    let path = config
        .get_string("data", "catalog_path")
        .unwrap_or_else(|| "data/instruments.csv".to_string());
    CsvCatalogAdapter::new(PathBuf::from(path))
}

fn run_evaluate(
    config_path: &PathBuf,
    code_override: Option<&str>,
    start_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let code = match resolve_code(code_override, &adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let start_date = match build_start_date(start_override, &adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let params = match build_evaluation_params(&adapter, start_date) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Fetching {code}...");
    let bars = match data_port.fetch_daily(&code) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Fetched {} bars", bars.len());

    eprintln!("Evaluating {code} from {start_date}...");
    let evaluation = match run_evaluation(&bars, &params) {
        Ok(ev) => ev,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let report = &evaluation.report;

    for action in &report.actions {
        println!("{action}");
    }

    eprintln!("\n=== Evaluation Summary ===");
    eprintln!("Rows simulated:  {}", evaluation.rows.len());
    eprintln!("Buys:            {}", report.buys.len());
    eprintln!("Sells:           {}", report.sells.len());
    eprintln!("Final cash:      {:.2}", report.final_state.cash);
    eprintln!("Shares held:     {}", report.final_state.shares_held);
    eprintln!("Total gain:      {:.2}", report.total_gain);

    if let Some(output) = output_path {
        let svg = render_price_chart(&evaluation.rows, &report.buys, &report.sells);
        if let Err(e) = fs::write(output, svg) {
            eprintln!("error: failed to write chart: {e}");
            return ExitCode::from(1);
        }
        eprintln!("\nChart written to: {}", output.display());
    }

    ExitCode::SUCCESS
}

fn run_instruments(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let catalog = build_catalog(&adapter);
    let instruments = match catalog.instruments() {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if instruments.is_empty() {
        eprintln!("No instruments in catalog");
    } else {
        for instrument in &instruments {
            println!("{}  {}", instrument.code, instrument.name);
        }
        eprintln!("{} instruments found", instruments.len());
    }
    ExitCode::SUCCESS
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use std::net::SocketAddr;
        use std::sync::Arc;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let data_port = match build_data_port(&config) {
            Ok(p) => Arc::from(p),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let catalog: Arc<dyn CatalogPort + Send + Sync> = Arc::new(build_catalog(&config));

        let addr: SocketAddr = config
            .get_string("web", "listen")
            .unwrap_or_else(|| "127.0.0.1:8050".to_string())
            .parse()
            .unwrap_or_else(|_| "127.0.0.1:8050".parse().unwrap());

        eprintln!("Starting web server on {addr}");

        let state = AppState {
            data_port,
            catalog,
            config: Arc::new(config),
        };
        let router = build_router(state);

        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
            axum::serve(listener, router).await.unwrap();
        });

        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
