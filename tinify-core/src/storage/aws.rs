use super::{merge_options, StorageConfiguration, SERVICE_KEY};
use serde_json::{Map, Value};

/// Amazon S3 (or S3-compatible) destination.
///
/// # Example
/// ```
/// use serde_json::json;
/// use tinify_core::storage::{Aws, StorageConfiguration};
///
/// let storage = Aws::new("us-east-1", "secret", "access")
///     .with_option("headers", json!({ "Cache-Control": "public, max-age=31536000" }));
///
/// let config = storage.configuration();
/// assert_eq!(config["service"], "aws");
/// assert_eq!(config["aws_access_key_id"], "access");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Aws {
    region: String,
    secret_access_key: String,
    access_key_id: String,
    options: Map<String, Value>,
}

impl Aws {
    pub fn new(
        region: impl Into<String>,
        secret_access_key: impl Into<String>,
        access_key_id: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            secret_access_key: secret_access_key.into(),
            access_key_id: access_key_id.into(),
            options: Map::new(),
        }
    }

    /// Add a provider field such as `headers` or `acl`.
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

impl StorageConfiguration for Aws {
    fn configuration(&self) -> Map<String, Value> {
        let mut base = Map::new();
        base.insert(SERVICE_KEY.into(), Value::from("aws"));
        base.insert("region".into(), Value::from(self.region.as_str()));
        base.insert(
            "aws_secret_access_key".into(),
            Value::from(self.secret_access_key.as_str()),
        );
        base.insert(
            "aws_access_key_id".into(),
            Value::from(self.access_key_id.as_str()),
        );

        merge_options(base, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_configuration_contains_required_keys_and_options() {
        let storage = Aws::new("us-east-1", "secret", "access").with_option(
            "headers",
            json!({ "Cache-Control": "public, max-age=31536000" }),
        );

        let config = Value::Object(storage.configuration());
        assert_eq!(
            config,
            json!({
                "service": "aws",
                "region": "us-east-1",
                "aws_secret_access_key": "secret",
                "aws_access_key_id": "access",
                "headers": { "Cache-Control": "public, max-age=31536000" }
            })
        );

        let keys: Vec<String> = storage.configuration().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "service",
                "region",
                "aws_secret_access_key",
                "aws_access_key_id",
                "headers"
            ]
        );
    }

    #[test]
    fn test_configuration_is_deterministic() {
        let storage = Aws::new("eu-west-3", "secret", "key").with_option("acl", json!("private"));
        assert_eq!(storage.configuration(), storage.configuration());
    }

    #[test]
    fn test_option_named_like_required_key_replaces_value() {
        let storage = Aws::new("eu-west-3", "secret", "key")
            .with_option("region", json!("eu-central-1"));

        let config = storage.configuration();
        assert_eq!(config["region"], json!("eu-central-1"));
        assert_eq!(config["service"], json!("aws"));
        assert_eq!(config.keys().nth(1).map(String::as_str), Some("region"));
        assert_eq!(storage.region(), "eu-west-3");
    }

    #[test]
    fn test_with_options_merges_map() {
        let mut options = Map::new();
        options.insert("acl".into(), json!("public-read"));
        let config = Aws::new("r", "s", "a").with_options(options).configuration();
        assert_eq!(config["acl"], json!("public-read"));
    }
}
