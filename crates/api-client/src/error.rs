use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to reach the market data provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("The provider answered with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("The provider reported an error ({code}): {description}")]
    Provider { code: String, description: String },

    #[error("The provider returned no data for {0}")]
    NoData(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("Failed to authenticate with the provider: {0}")]
    Unauthorized(String),
}
