use api_client::error::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{0} is not part of the configured market universe")]
    UnknownSymbol(String),

    #[error("Market data for {symbol} is unavailable: {source}")]
    Supplier {
        symbol: String,
        #[source]
        source: ApiError,
    },

    #[error("Analytics engine error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}

impl DashboardError {
    pub(crate) fn supplier(symbol: &str, source: ApiError) -> Self {
        DashboardError::Supplier {
            symbol: symbol.to_string(),
            source,
        }
    }
}
