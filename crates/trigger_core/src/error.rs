use thiserror::Error;

/// A request that never produced an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("scraper request timed out")]
    Timeout,
    #[error("failed to connect to scraper endpoint: {0}")]
    Connect(String),
    #[error("scraper request failed: {0}")]
    Request(String),
    #[error("invalid scraper url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::Request(error.to_string())
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(error: url::ParseError) -> Self {
        TransportError::InvalidUrl(error.to_string())
    }
}
