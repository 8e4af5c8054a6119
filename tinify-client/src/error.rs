use thiserror::Error;
use tinify_core::{NetworkError, TinifyError};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Network(#[from] NetworkError),

    #[error("Source has no location; it was never compressed by the service")]
    MissingLocation,

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] TinifyError),

    #[error("HTTP client configuration failed: {0}")]
    Configuration(String),
}

impl ClientError {
    /// The service failure behind this error, if any.
    pub fn network(&self) -> Option<&NetworkError> {
        match self {
            ClientError::Network(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.network().is_some_and(NetworkError::is_retryable)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
