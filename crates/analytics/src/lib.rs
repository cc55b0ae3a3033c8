//! # Tadawul Analytics Engine
//!
//! Pure, stateless computations that turn a daily price series (and a benchmark
//! series) into the descriptive statistics shown on the dashboard: moving averages,
//! the moving-average trend decision, volatility, Sharpe ratio, maximum drawdown,
//! beta, alpha, tracking error and information ratio.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O, no caching, no shared state. It depends only on
//!   `core-types`.
//! - **Undefined is not an error:** short histories, zero variances and missing
//!   overlaps resolve to `Metric::Undefined`. `AnalyticsError` is reserved for
//!   invalid parameters handed in by the caller.
//! - **Conventions are parameters:** the trading-year length and the risk-free
//!   rate come from `Conventions`, not from embedded constants.

pub mod engine;
pub mod error;
pub mod report;
pub mod stats;

pub use engine::{AnalyticsEngine, Conventions, IndicatorWindows};
pub use error::AnalyticsError;
pub use report::StockReport;
