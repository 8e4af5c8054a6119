use crate::error::{ClientError, Result};
use crate::models::{ErrorBody, ShrinkFromUrl, StoreRequest};
use crate::transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tinify_core::{
    Convert, NetworkError, NetworkErrorKind, Preserve, Resize, Source, StorageConfiguration,
    Transform,
};
use url::Url;

/// Default endpoint of the compression service.
pub const DEFAULT_BASE_URL: &str = "https://api.tinify.com";

/// Default request timeout for the built-in transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_USER_AGENT: &str = concat!("tinify-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the image compression service
///
/// Every operation performs at most one HTTP round trip and never retries.
/// Failed responses are classified into [`NetworkError`] kinds so callers
/// can tell account problems from bad requests and service outages.
#[derive(Clone)]
pub struct TinifyClient {
    base_url: Url,
    api_key: String,
    transport: Arc<dyn Transport>,
    http_only_urls: bool,
}

impl std::fmt::Debug for TinifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TinifyClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("http_only_urls", &self.http_only_urls)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a [`TinifyClient`].
pub struct TinifyClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    transport: Option<Arc<dyn Transport>>,
    http_only_urls: bool,
}

impl TinifyClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            transport: None,
            http_only_urls: false,
        }
    }

    /// Override the service endpoint (e.g. for a proxy or a test server).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request timeout. Ignored when a custom transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `User-Agent` header. Ignored when a custom transport is supplied.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Send requests through `transport` instead of the reqwest default.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Only accept `http` and `https` URLs in [`TinifyClient::from_url`].
    pub fn http_only_urls(mut self, enabled: bool) -> Self {
        self.http_only_urls = enabled;
        self
    }

    pub fn build(self) -> Result<TinifyClient> {
        // A trailing slash keeps any path prefix when joining endpoints
        let mut base_url = self.base_url.trim_end_matches('/').to_string();
        base_url.push('/');
        let base_url = Url::parse(&base_url)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new(self.timeout, &self.user_agent)
                    .map_err(|e| ClientError::Configuration(e.to_string()))?,
            ),
        };

        Ok(TinifyClient {
            base_url,
            api_key: self.api_key,
            transport,
            http_only_urls: self.http_only_urls,
        })
    }
}

impl TinifyClient {
    /// Create a new client with default configuration
    ///
    /// # Arguments
    /// * `api_key` - API key of the compression service account
    ///
    /// # Example
    /// ```no_run
    /// use tinify_client::TinifyClient;
    ///
    /// let client = TinifyClient::new("your-api-key").unwrap();
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        TinifyClientBuilder::new(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> TinifyClientBuilder {
        TinifyClientBuilder::new(api_key)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Compress an image held in memory
    ///
    /// Calls POST /shrink with the raw bytes as the body.
    ///
    /// # Example
    /// ```no_run
    /// # use tinify_client::TinifyClient;
    /// # let client = TinifyClient::new("your-api-key").unwrap();
    /// let source = client.from_buffer(std::fs::read("cat.png").unwrap()).unwrap();
    /// source.to_file("cat.min.png").unwrap();
    /// ```
    pub fn from_buffer(&self, data: impl Into<Vec<u8>>) -> Result<Source> {
        let data = data.into();
        let url = self.shrink_url()?;

        tracing::debug!("Uploading {} bytes to: {}", data.len(), url);

        let request = self.request(Method::Post, url).with_body(data);
        let source = self.source_from(self.execute(request)?);

        tracing::info!(
            "Compressed image to {} bytes ({}), compression count: {}",
            source.size(),
            source.media_type(),
            source.compression_count()
        );
        Ok(source)
    }

    /// Compress a local file.
    ///
    /// # Errors
    /// `ClientError::Io` if the file cannot be read
    pub fn from_file(&self, path: impl AsRef<Path>) -> Result<Source> {
        let path = path.as_ref();
        tracing::debug!("Reading image from: {}", path.display());

        let data = std::fs::read(path)?;
        self.from_buffer(data)
    }

    /// Let the service download and compress the image at `url`
    ///
    /// Calls POST /shrink with `{"source": {"url": url}}`.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidUrl` without contacting the service if
    /// `url` is not an absolute URL (or not `http`/`https` when the client
    /// was built with [`TinifyClientBuilder::http_only_urls`]).
    pub fn from_url(&self, url: &str) -> Result<Source> {
        let parsed = Url::parse(url).map_err(|e| {
            tracing::warn!("Rejected source URL {}: {}", url, e);
            ClientError::InvalidUrl(url.to_string())
        })?;

        if self.http_only_urls && !matches!(parsed.scheme(), "http" | "https") {
            tracing::warn!("Rejected source URL with scheme: {}", parsed.scheme());
            return Err(ClientError::InvalidUrl(url.to_string()));
        }

        let endpoint = self.shrink_url()?;
        tracing::debug!("Requesting compression of {} at: {}", parsed, endpoint);

        let request = self
            .request(Method::Post, endpoint)
            .with_json(&ShrinkFromUrl::new(url))?;
        let source = self.source_from(self.execute(request)?);

        tracing::info!(
            "Compressed {} to {} bytes, compression count: {}",
            parsed,
            source.size(),
            source.compression_count()
        );
        Ok(source)
    }

    /// Download the bytes of a compressed image
    ///
    /// Calls GET on the source location. A source without a location
    /// (built from local bytes) returns a copy of its own buffer and makes
    /// no request.
    pub fn to_buffer(&self, source: &Source) -> Result<Vec<u8>> {
        let Some(location) = source.location() else {
            tracing::debug!("Source has no location, returning held buffer");
            return Ok(source.as_bytes().to_vec());
        };

        let url = self.resolve(location)?;
        tracing::debug!("Downloading image from: {}", url);

        let response = self.execute(self.request(Method::Get, url))?;
        Ok(response.body)
    }

    /// Ask the service to store a compressed image in a cloud bucket
    ///
    /// Calls POST on the source location with
    /// `{"store": {...storage configuration, "path": path}}`.
    ///
    /// # Arguments
    /// * `source` - A source returned by the service (must have a location)
    /// * `path` - Destination as `bucket/key`
    /// * `storage` - Provider configuration
    ///
    /// # Example
    /// ```no_run
    /// # use tinify_client::TinifyClient;
    /// use tinify_core::storage::Aws;
    ///
    /// # let client = TinifyClient::new("your-api-key").unwrap();
    /// let source = client.from_file("cat.png").unwrap();
    /// let storage = Aws::new("eu-west-3", "secret-access-key", "access-key-id");
    /// let stored = client.to_cloud(&source, "my-bucket/images/cat.png", &storage).unwrap();
    /// println!("Stored at {:?}", stored.location());
    /// ```
    pub fn to_cloud<S>(&self, source: &Source, path: &str, storage: &S) -> Result<Source>
    where
        S: StorageConfiguration + ?Sized,
    {
        let location = source.location().ok_or(ClientError::MissingLocation)?;
        let url = self.resolve(location)?;

        let payload = StoreRequest::new(storage.configuration(), path);
        tracing::debug!("Storing {} to {}", url, path);

        let request = self.request(Method::Post, url).with_json(&payload)?;
        let stored = self.source_from(self.execute(request)?);

        tracing::info!("Stored image to: {}", path);
        Ok(stored)
    }

    /// Apply a transform to a compressed image
    ///
    /// Calls POST on the source location with the transform body. The
    /// transform is validated first; an invalid one fails without a request.
    pub fn transform(&self, source: &Source, transform: &Transform) -> Result<Source> {
        let body = transform.to_json()?;
        let location = source.location().ok_or(ClientError::MissingLocation)?;
        let url = self.resolve(location)?;

        tracing::debug!("Applying {} to: {}", transform.name(), url);

        let request = self.request(Method::Post, url).with_json(&body)?;
        let output = self.source_from(self.execute(request)?);

        tracing::info!(
            "Applied {}: {}x{} {} ({} bytes)",
            transform.name(),
            output.width(),
            output.height(),
            output.media_type(),
            output.size()
        );
        Ok(output)
    }

    pub fn resize(&self, source: &Source, resize: Resize) -> Result<Source> {
        self.transform(source, &Transform::Resize(resize))
    }

    pub fn convert(&self, source: &Source, convert: Convert) -> Result<Source> {
        self.transform(source, &Transform::Convert(convert))
    }

    /// Keep the given metadata from the original image.
    pub fn preserve(&self, source: &Source, items: &[Preserve]) -> Result<Source> {
        self.transform(source, &Transform::Preserve(items.to_vec()))
    }

    fn shrink_url(&self) -> Result<Url> {
        Ok(self.base_url.join("shrink")?)
    }

    /// Locations are normally absolute; relative ones resolve against the base URL.
    fn resolve(&self, location: &str) -> Result<Url> {
        Ok(self.base_url.join(location)?)
    }

    fn request(&self, method: Method, url: Url) -> HttpRequest {
        HttpRequest::new(method, url).with_basic_auth(self.api_key.as_str(), None)
    }

    /// One round trip; non-2xx responses become classified errors.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self.transport.send(request)?;

        if response.is_success() {
            return Ok(response);
        }

        let err = classify_response(&response);
        match err.kind() {
            NetworkErrorKind::Account => tracing::warn!("Account error: {}", err),
            _ => tracing::error!("Request failed: {}", err),
        }
        Err(err.into())
    }

    fn source_from(&self, response: HttpResponse) -> Source {
        Source::from_response(response.headers, response.body)
    }
}

/// Builds the classified error for a failed response.
fn classify_response(response: &HttpResponse) -> NetworkError {
    let body = ErrorBody::parse(&response.body);
    NetworkError::create(body.message, body.error, response.status)
}
