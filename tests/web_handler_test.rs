#![cfg(feature = "web")]
//! Web handler tests driven through the router with `oneshot`:
//! dashboard rendering, evaluation submissions, HTMX fragments, and error
//! status mapping.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use macdeval::adapters::web::{build_router, AppState};
use macdeval::ports::config_port::ConfigPort;
use std::sync::Arc;
use tower::ServiceExt;

use common::*;

struct MockConfigPort;

impl ConfigPort for MockConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match (section, key) {
            ("simulation", "start_date") => Some("2023-12-31".to_string()),
            _ => None,
        }
    }

    fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
        default
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        match (section, key) {
            ("simulation", "initial_cash") => 1000.0,
            _ => default,
        }
    }

    fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
        default
    }
}

fn create_test_app() -> Router {
    let bars = bars_from_closes("2024-01-01", &dip_and_rally_closes());
    let port = MockPricePort::new()
        .with_bars("BOM532540", bars)
        .with_error("BOM500325", "connection refused");

    let state = AppState {
        data_port: Arc::new(port),
        catalog: Arc::new(StaticCatalog::new(&[
            ("TCS", "BOM532540"),
            ("RELIANCE INDUSTRIES", "BOM500325"),
        ])),
        config: Arc::new(MockConfigPort),
    };

    build_router(state)
}

async fn body_text(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).into_owned()
}

fn evaluate_request(form: &str, htmx: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/evaluate")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if htmx {
        builder = builder.header("HX-Request", "true");
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

mod dashboard_tests {
    use super::*;

    #[tokio::test]
    async fn dashboard_renders_with_ok_status() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn dashboard_lists_catalog_instruments() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;

        assert!(html.contains("MACD Evaluator"));
        assert!(html.contains("BOM532540"));
        assert!(html.contains("TCS"));
        assert!(html.contains("2023-12-31"));
    }

    #[tokio::test]
    async fn dashboard_htmx_fragment_excludes_page_wrapper() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("HX-Request", "true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(response).await;

        assert!(html.contains("<div id=\"content\">"));
        assert!(!html.contains("<!DOCTYPE html>"));
    }
}

mod evaluate_tests {
    use super::*;

    #[tokio::test]
    async fn evaluation_returns_chart_and_summary() {
        let app = create_test_app();

        let response = app
            .oneshot(evaluate_request(
                "code=BOM532540&start_date=2023-12-31",
                true,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;

        assert!(html.contains("<svg"));
        assert!(html.contains("Total gain"));
        assert!(html.contains("bought 1 unit(s) at 95.00"));
        assert!(html.contains("sold 1 unit(s) at 105.00"));
    }

    #[tokio::test]
    async fn full_page_response_without_htmx() {
        let app = create_test_app();

        let response = app
            .oneshot(evaluate_request(
                "code=BOM532540&start_date=2023-12-31",
                false,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<svg"));
    }

    #[tokio::test]
    async fn invalid_date_is_a_bad_request() {
        let app = create_test_app();

        let response = app
            .oneshot(evaluate_request("code=BOM532540&start_date=tomorrow", true))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_instrument_is_unprocessable() {
        let app = create_test_app();

        let response = app
            .oneshot(evaluate_request(
                "code=BOM999999&start_date=2023-12-31",
                true,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn upstream_failure_is_a_bad_gateway() {
        let app = create_test_app();

        let response = app
            .oneshot(evaluate_request(
                "code=BOM500325&start_date=2023-12-31",
                true,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}

mod routing_tests {
    use super::*;

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
