//! Browser UI adapter.
//!
//! Axum server with an HTMX form: pick an instrument and a start date,
//! submit, and the evaluated chart plus action log come back as a fragment.
//! Each submission triggers one full evaluation from scratch; no state is
//! kept between requests.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::ports::catalog_port::CatalogPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;

pub struct AppState {
    pub data_port: Arc<dyn PriceDataPort + Send + Sync>,
    pub catalog: Arc<dyn CatalogPort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/evaluate", post(handlers::evaluate))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
