use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard::DashboardError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Dashboard(DashboardError::UnknownSymbol(symbol)) => (
                StatusCode::NOT_FOUND,
                format!("{} is not part of the configured market universe", symbol),
            ),
            AppError::Dashboard(err @ DashboardError::Supplier { .. }) => {
                tracing::error!(error = ?err, "Market data supplier failed.");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            AppError::Dashboard(err @ DashboardError::Analytics(_)) => {
                tracing::error!(error = ?err, "Analytics error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during analysis".to_string(),
                )
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
