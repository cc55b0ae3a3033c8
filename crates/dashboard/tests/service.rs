use api_client::MarketDataClient;
use api_client::error::ApiError;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use configuration::settings::Config;
use core_types::{FinancialSnapshot, Lookback, Metric, PriceSeries, TrendSignal};
use dashboard::{Dashboard, DashboardError, render_decision, render_stock_view};
use std::collections::HashMap;

const BENCHMARK: &str = "^TASI.SR";

/// In-memory supplier. Unknown tickers answer `NoData`; tickers listed in
/// `failing` answer a transport-like status error.
#[derive(Default)]
struct StaticClient {
    prices: HashMap<String, PriceSeries>,
    fundamentals: HashMap<String, FinancialSnapshot>,
    failing: Vec<String>,
}

#[async_trait]
impl MarketDataClient for StaticClient {
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError> {
        if self.failing.iter().any(|t| t == ticker) {
            return Err(ApiError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let series = self
            .prices
            .get(ticker)
            .map(|s| s.since(start))
            .filter(|s| !s.is_empty() && s.last().is_some_and(|b| b.date <= end))
            .ok_or_else(|| ApiError::NoData(ticker.to_string()))?;
        Ok(series)
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FinancialSnapshot, ApiError> {
        if self.failing.iter().any(|t| t == ticker) {
            return Err(ApiError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.fundamentals.get(ticker).copied().unwrap_or_default())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
}

/// `n` daily closes ending on `today()`.
fn series_ending_today(symbol: &str, closes: &[f64]) -> PriceSeries {
    let start = today()
        .checked_sub_days(Days::new(closes.len() as u64 - 1))
        .unwrap();
    PriceSeries::from_closes(symbol, start, closes).unwrap()
}

fn rising(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
}

fn client_with(symbol: &str, closes: &[f64]) -> StaticClient {
    let mut client = StaticClient::default();
    client
        .prices
        .insert(symbol.to_string(), series_ending_today(symbol, closes));
    client
        .prices
        .insert(BENCHMARK.to_string(), series_ending_today(BENCHMARK, closes));
    client.fundamentals.insert(
        symbol.to_string(),
        FinancialSnapshot::new(
            Metric::Value(18.0),
            Metric::Value(0.2),
            Metric::Value(0.1),
            Metric::Value(0.05),
            Metric::Value(0.7),
        ),
    );
    client
}

fn dashboard(client: StaticClient) -> Dashboard<StaticClient> {
    Dashboard::from_config(client, &Config::default()).unwrap()
}

#[tokio::test]
async fn stock_view_uses_lookback_window_and_year_long_decision() {
    let dash = dashboard(client_with("2222.SR", &rising(400)));

    let view = dash
        .stock_view("2222.sr", Lookback::OneMonth, today())
        .await
        .unwrap();

    assert_eq!(view.listing.symbol, "2222.SR");
    assert_eq!(view.start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
    assert_eq!(view.history.len(), 31);
    assert_eq!(view.indicators.len(), 31);
    // One month of history alone could never satisfy the 200-session rule.
    assert_eq!(view.decision, TrendSignal::Buy);
    assert_eq!(view.latest_close, Metric::Value(100.0 + 399.0 * 0.5));

    let beta = view.risk.beta.into_option().unwrap();
    assert!((beta - 1.0).abs() < 1e-12);
    assert!((view.portfolio.tracking_error.into_option().unwrap()).abs() < 1e-12);
    assert!(view.portfolio.information_ratio.is_undefined());
    assert_eq!(view.risk.max_drawdown, Metric::Value(0.0));
}

#[tokio::test]
async fn stock_view_serializes_undefined_as_null() {
    let dash = dashboard(client_with("2222.SR", &rising(400)));
    let view = dash
        .stock_view("2222.SR", Lookback::OneMonth, today())
        .await
        .unwrap();

    let json = serde_json::to_value(&view).unwrap();
    assert!(json["indicators"][0]["sma_long"].is_null());
    assert!(json["indicators"][30]["sma_short"].is_number());
    assert_eq!(json["lookback"], "1M");
    assert_eq!(json["decision"], "buy");
}

#[tokio::test]
async fn unknown_symbol_is_rejected_before_fetching() {
    let dash = dashboard(StaticClient::default());
    let err = dash
        .stock_view("AAPL", Lookback::default(), today())
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::UnknownSymbol(s) if s == "AAPL"));
}

#[tokio::test]
async fn benchmark_failure_fails_the_view() {
    let mut client = client_with("1180.SR", &rising(300));
    client.failing.push(BENCHMARK.to_string());
    let dash = dashboard(client);

    let err = dash
        .stock_view("1180.SR", Lookback::SixMonths, today())
        .await
        .unwrap_err();
    match err {
        DashboardError::Supplier { symbol, source } => {
            assert_eq!(symbol, BENCHMARK);
            assert!(matches!(source, ApiError::Status { status: 503, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn decision_reports_each_trend() {
    let falling: Vec<f64> = (0..300).map(|i| 300.0 - i as f64 * 0.5).collect();
    let dash = dashboard(client_with("1010.SR", &falling));
    let view = dash.decision("1010.SR", today()).await.unwrap();
    assert_eq!(view.signal, TrendSignal::Sell);
    assert_eq!(view.label, "Sell / strong downtrend");
    assert_eq!(view.observations, 300);
    assert!(render_decision(&view).contains("Sell / strong downtrend"));

    let short = dashboard(client_with("1010.SR", &rising(120)));
    let view = short.decision("1010.SR", today()).await.unwrap();
    assert_eq!(view.signal, TrendSignal::InsufficientData);
    assert_eq!(view.observations, 120);
}

#[tokio::test]
async fn decision_without_history_is_insufficient_data() {
    let dash = dashboard(StaticClient::default());
    let view = dash.decision("2350.SR", today()).await.unwrap();
    assert_eq!(view.signal, TrendSignal::InsufficientData);
    assert_eq!(view.observations, 0);
}

#[tokio::test]
async fn decision_surfaces_supplier_failures() {
    let mut client = StaticClient::default();
    client.failing.push("2350.SR".to_string());
    let dash = dashboard(client);
    let err = dash.decision("2350.SR", today()).await.unwrap_err();
    assert!(matches!(err, DashboardError::Supplier { .. }));
}

#[tokio::test]
async fn overview_keeps_rows_for_failed_listings() {
    let mut client = client_with("2222.SR", &rising(10));
    client.failing.push("1150.SR".to_string());
    let dash = dashboard(client);

    let overview = dash.market_overview().await;
    assert_eq!(overview.rows.len(), dash.universe().listings.len());
    assert_eq!(overview.failures(), 1);

    let failed = overview
        .rows
        .iter()
        .find(|r| r.listing.symbol == "1150.SR")
        .unwrap();
    assert!(failed.fundamentals.pe_ratio.is_undefined());
    assert!(failed.failure.as_deref().unwrap().contains("503"));

    let aramco = &overview.rows[0];
    assert_eq!(aramco.listing.symbol, "2222.SR");
    assert_eq!(aramco.fundamentals.pe_ratio, Metric::Value(18.0));
}

#[tokio::test]
async fn rendered_stock_view_shows_na_for_undefined() {
    let dash = dashboard(client_with("2222.SR", &rising(400)));
    let view = dash
        .stock_view("2222.SR", Lookback::OneMonth, today())
        .await
        .unwrap();
    let out = render_stock_view(&view);
    assert!(out.contains("Saudi Aramco (2222.SR) vs ^TASI.SR"));
    assert!(out.contains("N/A"));
    assert!(out.contains("Buy / strong uptrend"));

    // Every fundamental of the snapshot is on screen.
    for (label, value) in [
        ("P/E", "18.00"),
        ("ROE", "20.00%"),
        ("ROA", "10.00%"),
        ("Dividend Yield", "5.00%"),
        ("Payout Ratio", "70.00%"),
        ("Dividend Score", "High"),
    ] {
        assert!(out.contains(label), "missing {label}");
        assert!(out.contains(value), "missing {label} value {value}");
    }

    // The tail of the price history is listed with its volume.
    assert!(out.contains("Volume"));
    assert!(out.contains("2024-12-31"));
    assert!(out.contains("299.50"));
}
