use std::fmt;
use thiserror::Error;

/// Message used when the service returned no (or a blank) message.
pub const FALLBACK_MESSAGE: &str = "No message was provided";

/// Error code attached to transport failures that never produced a response.
pub const CONNECTION_ERROR_CODE: &str = "ConnectionError";

#[derive(Error, Debug)]
pub enum TinifyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid resize: {0}")]
    InvalidResize(String),

    #[error("Invalid image type: {0}")]
    InvalidImageType(String),

    #[error("Invalid preserve option: {0}")]
    InvalidPreserve(String),
}

pub type Result<T> = std::result::Result<T, TinifyError>;

/// Category of a failed exchange with the compression service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    /// Authorization failure or exhausted quota (HTTP 401 / 429).
    Account,
    /// Any other 4xx status.
    Client,
    /// 5xx status.
    Server,
    /// Unexpected status, or a transport failure without a status.
    Network,
}

impl NetworkErrorKind {
    /// Maps an HTTP status onto its error category.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 429 => NetworkErrorKind::Account,
            400..=499 => NetworkErrorKind::Client,
            500..=599 => NetworkErrorKind::Server,
            _ => NetworkErrorKind::Network,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkErrorKind::Account => "account",
            NetworkErrorKind::Client => "client",
            NetworkErrorKind::Server => "server",
            NetworkErrorKind::Network => "network",
        }
    }
}

/// A failure reported by (or while talking to) the compression service.
///
/// Built once from the failed response and never mutated. The `Display`
/// output is the formatted message, e.g. `Bad request (HTTP 400/BadRequest)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkError {
    kind: NetworkErrorKind,
    message: String,
    status: Option<u16>,
    code: String,
}

impl NetworkError {
    /// Classifies a failed response.
    ///
    /// # Arguments
    /// * `message` - Message from the error body (blank means none was given)
    /// * `code` - Error code from the error body, e.g. `BadRequest`
    /// * `status` - HTTP status of the response
    ///
    /// # Example
    /// ```
    /// use tinify_core::{NetworkError, NetworkErrorKind};
    ///
    /// let err = NetworkError::create("Bad request", "BadRequest", 400);
    /// assert_eq!(err.kind(), NetworkErrorKind::Client);
    /// assert_eq!(err.to_string(), "Bad request (HTTP 400/BadRequest)");
    /// ```
    pub fn create(message: impl Into<String>, code: impl Into<String>, status: u16) -> Self {
        Self {
            kind: NetworkErrorKind::from_status(status),
            message: normalize_message(message.into()),
            status: Some(status),
            code: code.into(),
        }
    }

    /// Failure below HTTP (DNS, refused connection, timeout, reset).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: NetworkErrorKind::Network,
            message: normalize_message(message.into()),
            status: None,
            code: CONNECTION_ERROR_CODE.to_string(),
        }
    }

    pub fn kind(&self) -> NetworkErrorKind {
        self.kind
    }

    /// Message as reported by the service, or the fallback text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, absent for transport failures.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_account_error(&self) -> bool {
        self.kind == NetworkErrorKind::Account
    }

    pub fn is_client_error(&self) -> bool {
        self.kind == NetworkErrorKind::Client
    }

    pub fn is_server_error(&self) -> bool {
        self.kind == NetworkErrorKind::Server
    }

    /// Returns `true` when repeating the same request later may succeed.
    ///
    /// Rate limiting (429), 5xx responses and transport failures qualify.
    /// The client itself never retries; this is for the caller to decide.
    pub fn is_retryable(&self) -> bool {
        match self.status {
            None => true,
            Some(429) => true,
            Some(_) => self.kind == NetworkErrorKind::Server,
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {}/{})", self.message, status, self.code),
            None => write!(f, "{} ({})", self.message, self.code),
        }
    }
}

impl std::error::Error for NetworkError {}

fn normalize_message(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_and_too_many_requests_are_account_errors() {
        let unauthorized = NetworkError::create("Unauthorized", "Unauthorized", 401);
        let too_many = NetworkError::create("Too many requests", "TooManyRequests", 429);

        assert_eq!(unauthorized.kind(), NetworkErrorKind::Account);
        assert_eq!(too_many.kind(), NetworkErrorKind::Account);
        assert!(unauthorized.is_account_error());
    }

    #[test]
    fn test_4xx_is_client_error() {
        let err = NetworkError::create("Bad request", "BadRequest", 400);
        assert_eq!(err.kind(), NetworkErrorKind::Client);
        assert_eq!(err.to_string(), "Bad request (HTTP 400/BadRequest)");

        let err = NetworkError::create("Unsupported", "Unsupported", 415);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_5xx_is_server_error() {
        let err = NetworkError::create("Internal server error", "InternalServerError", 500);
        assert_eq!(err.kind(), NetworkErrorKind::Server);
        assert_eq!(
            err.to_string(),
            "Internal server error (HTTP 500/InternalServerError)"
        );
        assert!(NetworkError::create("", "Unavailable", 599).is_server_error());
    }

    #[test]
    fn test_unexpected_status_falls_back_to_base_kind() {
        let err = NetworkError::create("", "UnknownError", 200);
        assert_eq!(err.kind(), NetworkErrorKind::Network);
        assert_eq!(err.to_string(), "No message was provided (HTTP 200/UnknownError)");

        assert_eq!(
            NetworkError::create("moved", "Redirect", 302).kind(),
            NetworkErrorKind::Network
        );
        assert_eq!(
            NetworkError::create("odd", "Odd", 600).kind(),
            NetworkErrorKind::Network
        );
    }

    #[test]
    fn test_blank_message_uses_fallback() {
        let err = NetworkError::create("   ", "BadRequest", 400);
        assert_eq!(err.message(), FALLBACK_MESSAGE);
        assert_eq!(err.to_string(), "No message was provided (HTTP 400/BadRequest)");
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = NetworkError::transport("connection refused");
        assert_eq!(err.kind(), NetworkErrorKind::Network);
        assert_eq!(err.status(), None);
        assert_eq!(err.code(), CONNECTION_ERROR_CODE);
        assert_eq!(err.to_string(), "connection refused (ConnectionError)");
    }

    #[test]
    fn test_retryable() {
        assert!(NetworkError::create("slow down", "TooManyRequests", 429).is_retryable());
        assert!(NetworkError::create("oops", "InternalServerError", 503).is_retryable());
        assert!(NetworkError::transport("timed out").is_retryable());
        assert!(!NetworkError::create("bad key", "Unauthorized", 401).is_retryable());
        assert!(!NetworkError::create("bad", "BadRequest", 400).is_retryable());
    }

    #[test]
    fn test_kind_from_status_table() {
        assert_eq!(NetworkErrorKind::from_status(401), NetworkErrorKind::Account);
        assert_eq!(NetworkErrorKind::from_status(429), NetworkErrorKind::Account);
        assert_eq!(NetworkErrorKind::from_status(404), NetworkErrorKind::Client);
        assert_eq!(NetworkErrorKind::from_status(499), NetworkErrorKind::Client);
        assert_eq!(NetworkErrorKind::from_status(500), NetworkErrorKind::Server);
        assert_eq!(NetworkErrorKind::from_status(204), NetworkErrorKind::Network);
        assert_eq!(NetworkErrorKind::Server.as_str(), "server");
    }
}
