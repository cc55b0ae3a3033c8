use crate::{error::AppError, AppState};
use api_client::MarketDataClient;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use core_types::Lookback;
use dashboard::{DecisionView, MarketOverview, StockView};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// One of `1M`, `3M`, `6M`, `1Y`, `2Y`, `5Y`. Defaults to the universe's lookback.
    pub period: Option<String>,
}

/// # GET /api/overview
/// Fundamentals for every listing; failed listings carry a `failure` message.
pub async fn get_overview<C: MarketDataClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Json<MarketOverview> {
    Json(state.dashboard.market_overview().await)
}

/// # GET /api/stocks/:symbol?period=6M
pub async fn get_stock<C: MarketDataClient + 'static>(
    Path(symbol): Path<String>,
    Query(query): Query<PeriodQuery>,
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<StockView>, AppError> {
    let lookback = match query.period.as_deref() {
        Some(code) => code
            .parse::<Lookback>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => state.dashboard.universe().default_lookback,
    };
    let view = state
        .dashboard
        .stock_view(&symbol, lookback, (state.today)())
        .await?;
    Ok(Json(view))
}

/// # GET /api/stocks/:symbol/decision
pub async fn get_decision<C: MarketDataClient + 'static>(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<DecisionView>, AppError> {
    let view = state.dashboard.decision(&symbol, (state.today)()).await?;
    Ok(Json(view))
}
