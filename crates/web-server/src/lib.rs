use api_client::MarketDataClient;
use axum::{routing::get, Router};
use chrono::{NaiveDate, Utc};
use dashboard::Dashboard;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState<C> {
    pub dashboard: Dashboard<C>,
    /// Supplies the last day of every requested window.
    pub today: fn() -> NaiveDate,
}

impl<C> AppState<C> {
    pub fn new(dashboard: Dashboard<C>) -> Self {
        Self {
            dashboard,
            today: utc_today,
        }
    }
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Builds the JSON API over a dashboard.
pub fn router<C: MarketDataClient + 'static>(state: Arc<AppState<C>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/overview", get(handlers::get_overview::<C>))
        .route("/api/stocks/:symbol", get(handlers::get_stock::<C>))
        .route("/api/stocks/:symbol/decision", get(handlers::get_decision::<C>))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves the dashboard until the process is stopped.
///
/// Tracing is initialized by the binary before this is called.
pub async fn run_server<C: MarketDataClient + 'static>(
    addr: SocketAddr,
    dashboard: Dashboard<C>,
) -> anyhow::Result<()> {
    let app = router(Arc::new(AppState::new(dashboard)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
