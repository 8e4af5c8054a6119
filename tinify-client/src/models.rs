use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error code used when the service did not send one.
pub const UNKNOWN_ERROR_CODE: &str = "UnknownError";

/// Body of a failed response: `{"error": "...", "message": "..."}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: String,

    #[serde(default)]
    pub message: String,
}

impl ErrorBody {
    /// Parse a failed response body.
    ///
    /// Anything that is not the expected JSON object yields an empty
    /// message and [`UNKNOWN_ERROR_CODE`].
    pub fn parse(body: &[u8]) -> Self {
        let mut parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        if parsed.error.trim().is_empty() {
            parsed.error = UNKNOWN_ERROR_CODE.to_string();
        }
        parsed
    }
}

/// `{"source": {"url": "..."}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShrinkFromUrl {
    pub source: UrlSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlSource {
    pub url: String,
}

impl ShrinkFromUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            source: UrlSource { url: url.into() },
        }
    }
}

/// `{"store": {"service": ..., ..., "path": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreRequest {
    pub store: Map<String, Value>,
}

impl StoreRequest {
    /// Appends `path` to the provider configuration.
    pub fn new(mut configuration: Map<String, Value>, path: &str) -> Self {
        configuration.insert("path".to_string(), Value::from(path));
        Self {
            store: configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_parse() {
        let body = ErrorBody::parse(br#"{"error":"Unauthorized","message":"Credentials are invalid."}"#);
        assert_eq!(body.error, "Unauthorized");
        assert_eq!(body.message, "Credentials are invalid.");
    }

    #[test]
    fn test_error_body_missing_fields() {
        let body = ErrorBody::parse(br#"{"message":"Oops"}"#);
        assert_eq!(body.error, UNKNOWN_ERROR_CODE);
        assert_eq!(body.message, "Oops");
    }

    #[test]
    fn test_error_body_not_json() {
        let body = ErrorBody::parse(b"<html>Bad Gateway</html>");
        assert_eq!(body, ErrorBody {
            error: UNKNOWN_ERROR_CODE.to_string(),
            message: String::new(),
        });
    }

    #[test]
    fn test_shrink_from_url_serialization() {
        let json = serde_json::to_value(ShrinkFromUrl::new("https://example.com/cat.png")).unwrap();
        assert_eq!(json, json!({ "source": { "url": "https://example.com/cat.png" } }));
    }

    #[test]
    fn test_store_request_appends_path_last() {
        let mut config = Map::new();
        config.insert("service".into(), json!("gcs"));
        config.insert("gcp_access_token".into(), json!("token"));

        let request = StoreRequest::new(config, "bucket/file.png");
        let keys: Vec<&str> = request.store.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["service", "gcp_access_token", "path"]);
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"store":{"service":"gcs","gcp_access_token":"token","path":"bucket/file.png"}}"#
        );
    }
}
