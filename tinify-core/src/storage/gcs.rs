use super::{merge_options, StorageConfiguration, SERVICE_KEY};
use serde_json::{Map, Value};

/// Google Cloud Storage destination, authorized with an OAuth access token.
#[derive(Debug, Clone, PartialEq)]
pub struct Gcs {
    access_token: String,
    options: Map<String, Value>,
}

impl Gcs {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options.extend(options);
        self
    }
}

impl StorageConfiguration for Gcs {
    fn configuration(&self) -> Map<String, Value> {
        let mut base = Map::new();
        base.insert(SERVICE_KEY.into(), Value::from("gcs"));
        base.insert(
            "gcp_access_token".into(),
            Value::from(self.access_token.as_str()),
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
        let storage = Gcs::new("token").with_option(
            "headers",
            json!({ "Cache-Control": "public, max-age=31536000" }),
        );

        assert_eq!(
            Value::Object(storage.configuration()),
            json!({
                "service": "gcs",
                "gcp_access_token": "token",
                "headers": { "Cache-Control": "public, max-age=31536000" }
            })
        );
    }

    #[test]
    fn test_configuration_without_options() {
        let config = Gcs::new("token").configuration();
        assert_eq!(config.len(), 2);
        assert_eq!(config.keys().next().map(String::as_str), Some("service"));
    }
}
