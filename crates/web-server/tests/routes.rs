use api_client::MarketDataClient;
use api_client::error::ApiError;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{Days, NaiveDate};
use configuration::settings::Config;
use core_types::{FinancialSnapshot, Metric, PriceSeries};
use dashboard::Dashboard;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use web_server::{router, AppState};

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
}

/// Every ticker gets the same rising history; `1150.SR` always fails.
struct StubClient;

#[async_trait]
impl MarketDataClient for StubClient {
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<PriceSeries, ApiError> {
        if ticker == "1150.SR" {
            return Err(ApiError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        let first = fixed_today().checked_sub_days(Days::new(299)).unwrap();
        let closes: Vec<f64> = (0..300).map(|i| 50.0 + i as f64 * 0.25).collect();
        let series = PriceSeries::from_closes(ticker, first, &closes)
            .map_err(|e| ApiError::InvalidData(e.to_string()))?;
        Ok(series.since(start))
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FinancialSnapshot, ApiError> {
        if ticker == "1150.SR" {
            return Err(ApiError::NoData(ticker.to_string()));
        }
        Ok(FinancialSnapshot::new(
            Metric::Value(12.5),
            Metric::Undefined,
            Metric::Undefined,
            Metric::Value(0.03),
            Metric::Undefined,
        ))
    }
}

fn app() -> axum::Router {
    let dashboard = Dashboard::from_config(StubClient, &Config::default()).unwrap();
    let mut state = AppState::new(dashboard);
    state.today = fixed_today;
    router(Arc::new(state))
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_is_ok() {
    let (status, _) = get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn stock_view_honours_period() {
    let (status, body) = get("/api/stocks/2222.SR?period=3m").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lookback"], "3M");
    assert_eq!(body["start"], "2024-10-02");
    assert_eq!(body["decision"], "buy");
    assert_eq!(body["fundamentals"]["dividend_score"], "Low");
    assert!(body["fundamentals"]["return_on_equity"].is_null());
}

#[tokio::test]
async fn stock_view_defaults_to_six_months() {
    let (status, body) = get("/api/stocks/1180.SR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lookback"], "6M");
}

#[tokio::test]
async fn bad_period_is_a_client_error() {
    let (status, body) = get("/api/stocks/2222.SR?period=10Y").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_symbol_is_not_found() {
    let (status, body) = get("/api/stocks/TSLA/decision").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("TSLA"));
}

#[tokio::test]
async fn supplier_failure_is_bad_gateway() {
    let (status, _) = get("/api/stocks/1150.SR/decision").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn decision_carries_label() {
    let (status, body) = get("/api/stocks/2222.SR/decision").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["signal"], "buy");
    assert_eq!(body["label"], "Buy / strong uptrend");
    assert_eq!(body["observations"], 300);
}

#[tokio::test]
async fn overview_lists_whole_universe() {
    let (status, body) = get("/api/overview").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 10);
    let failed: Vec<_> = rows.iter().filter(|r| !r["failure"].is_null()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["listing"]["symbol"], "1150.SR");
}
