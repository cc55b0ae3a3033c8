use thiserror::Error;

/// Errors raised for caller mistakes. Data-quality problems never show up here;
/// they resolve to `Metric::Undefined` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Moving-average window must be a positive number of observations, got {0}")]
    InvalidWindow(usize),

    #[error("Analytics engine received invalid parameters: {0}")]
    InvalidParameters(String),
}
