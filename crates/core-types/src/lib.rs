//! Shared data model for the Tadawul dashboard.
//!
//! Every other crate in the workspace speaks in these types: the data supplier
//! produces `PriceSeries` and `FinancialSnapshot` values, the analytics engine
//! turns them into `RiskMetrics`, `PortfolioMetrics` and `TechnicalIndicatorRow`s,
//! and the presentation layers render them. Missing or uncomputable values are
//! carried as `Metric::Undefined`, never as zero.

pub mod enums;
pub mod error;
pub mod metric;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{DividendScore, Lookback, TrendSignal, HIGH_YIELD_THRESHOLD};
pub use error::CoreError;
pub use metric::Metric;
pub use structs::{
    Bar, FinancialSnapshot, Listing, PortfolioMetrics, PriceSeries, RiskMetrics,
    TechnicalIndicatorRow,
};
