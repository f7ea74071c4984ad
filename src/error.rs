use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Failed to fetch page: {0}")]
    FetchFailed(String),
}

impl From<url::ParseError> for ExtractError {
    fn from(e: url::ParseError) -> Self {
        ExtractError::InvalidUrl(e.to_string())
    }
}

impl ExtractError {
    pub fn log(&self) {
        match self {
            ExtractError::InvalidUrl(e) => {
                warn!(error = %e, "URL validation failed");
            }
            ExtractError::UnsupportedScheme(scheme) => {
                warn!(scheme = %scheme, "Rejected URL with unsupported scheme");
            }
            ExtractError::Timeout(e) => {
                warn!(error = %e, "Page fetch timed out");
            }
            ExtractError::FetchFailed(e) => {
                error!(error = %e, "Page fetch failed");
            }
        }
    }
}
