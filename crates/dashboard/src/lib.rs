//! # Tadawul Dashboard
//!
//! The request/response boundary between data and presentation. A caller asks
//! for a view (`stock_view`, `decision`, `market_overview`) and receives a fully
//! computed view-model; rendering is a separate, side-effect-free step.
//!
//! The `Dashboard` is generic over `MarketDataClient`, so the same code runs
//! against Yahoo Finance in production and an in-memory supplier in tests.

pub mod error;
pub mod render;
pub mod service;
pub mod view;

pub use error::DashboardError;
pub use render::{render_decision, render_overview, render_stock_view};
pub use service::Dashboard;
pub use view::{DecisionView, MarketOverview, OverviewRow, PricePoint, StockView};
