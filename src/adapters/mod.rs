//! Concrete port implementations.

pub mod quandl_adapter;
pub mod csv_price_adapter;
pub mod catalog_adapter;
pub mod file_config_adapter;
pub mod chart;
#[cfg(feature = "web")]
pub mod web;
