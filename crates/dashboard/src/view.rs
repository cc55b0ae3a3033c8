//! Fully-resolved view-models.
//!
//! A view-model carries everything a screen needs, already computed. Renderers
//! (terminal tables, the JSON API) only format; they never fetch or calculate.

use chrono::NaiveDate;
use core_types::{
    FinancialSnapshot, Listing, Lookback, Metric, PortfolioMetrics, RiskMetrics,
    TechnicalIndicatorRow, TrendSignal,
};
use serde::Serialize;

/// One point of the price chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
}

/// The single-stock analysis screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockView {
    pub listing: Listing,
    pub benchmark: String,
    pub lookback: Lookback,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub latest_close: Metric<f64>,
    /// Trend rule evaluated over at least one year of history, whatever the lookback.
    pub decision: TrendSignal,
    pub fundamentals: FinancialSnapshot,
    pub history: Vec<PricePoint>,
    pub indicators: Vec<TechnicalIndicatorRow>,
    pub risk: RiskMetrics,
    pub portfolio: PortfolioMetrics,
}

/// The answer of the investment-decision calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionView {
    pub listing: Listing,
    pub as_of: NaiveDate,
    pub observations: usize,
    pub signal: TrendSignal,
    pub label: &'static str,
}

/// One row of the market comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub listing: Listing,
    pub fundamentals: FinancialSnapshot,
    /// Set when the supplier failed for this listing; fundamentals are then undefined.
    pub failure: Option<String>,
}

/// The market comparison table across the whole universe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketOverview {
    pub rows: Vec<OverviewRow>,
}

impl MarketOverview {
    pub fn failures(&self) -> usize {
        self.rows.iter().filter(|r| r.failure.is_some()).count()
    }
}
