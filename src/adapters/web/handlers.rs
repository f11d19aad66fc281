//! HTTP request handlers for the web adapter.
//!
//! The data port is blocking, so evaluations run inside `spawn_blocking`.

use askama::Template;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Form,
};
use std::sync::Arc;

use crate::adapters::chart::render_price_chart;
use crate::cli::build_evaluation_params;
use crate::domain::evaluate::run_evaluation;

use super::{is_htmx_request, AppState, WebError};

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let catalog = Arc::clone(&state.catalog);
    let instruments = tokio::task::spawn_blocking(move || catalog.instruments())
        .await
        .map_err(|e| WebError::internal(e.to_string()))??;

    let default_start = state
        .config
        .get_string("simulation", "start_date")
        .unwrap_or_else(|| "2020-01-01".to_string());

    let template = super::templates::DashboardTemplate {
        instruments: &instruments,
        default_start: &default_start,
    };

    if is_htmx_request(&headers) {
        Ok(Html(template.fragment()).into_response())
    } else {
        let html = template
            .render()
            .map_err(|e| WebError::internal(e.to_string()))?;
        Ok(Html(html).into_response())
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct EvaluateFormData {
    pub code: String,
    pub start_date: String,
}

pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<EvaluateFormData>,
) -> Result<Response, WebError> {
    let start_date = chrono::NaiveDate::parse_from_str(&form.start_date, "%Y-%m-%d")
        .map_err(|_| WebError::bad_request("invalid start date, expected YYYY-MM-DD"))?;

    let code = form.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(WebError::bad_request("no instrument selected"));
    }

    let params = build_evaluation_params(&*state.config, start_date)?;

    let data_port = Arc::clone(&state.data_port);
    let fetch_code = code.clone();
    let evaluation = tokio::task::spawn_blocking(move || {
        let bars = data_port.fetch_daily(&fetch_code)?;
        run_evaluation(&bars, &params)
    })
    .await
    .map_err(|e| WebError::internal(e.to_string()))??;

    let svg = render_price_chart(
        &evaluation.rows,
        &evaluation.report.buys,
        &evaluation.report.sells,
    );

    let template = super::templates::ReportTemplate {
        code: &code,
        start_date,
        svg: &svg,
        buys: &evaluation.report.buys,
        sells: &evaluation.report.sells,
        total_gain: evaluation.report.total_gain,
        final_cash: evaluation.report.final_state.cash,
        shares_held: evaluation.report.final_state.shares_held,
        actions: &evaluation.report.actions,
    };

    if is_htmx_request(&headers) {
        Ok(Html(template.fragment()).into_response())
    } else {
        let html = template
            .render()
            .map_err(|e| WebError::internal(e.to_string()))?;
        Ok(Html(html).into_response())
    }
}

pub async fn not_found() -> WebError {
    WebError::not_found("no such page")
}
