use core_types::{Metric, PortfolioMetrics, RiskMetrics, TechnicalIndicatorRow, TrendSignal};
use serde::{Deserialize, Serialize};

/// All engine-derived figures for one stock over one series.
///
/// This is the output of `AnalyticsEngine::report` and the analytics half of the
/// dashboard's stock view. Fundamentals are not included; they come straight
/// from the data supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    pub symbol: String,
    pub observations: usize,
    pub latest_close: Metric<f64>,
    pub decision: TrendSignal,
    pub indicators: Vec<TechnicalIndicatorRow>,
    pub risk: RiskMetrics,
    pub portfolio: PortfolioMetrics,
}
