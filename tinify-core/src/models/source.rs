use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Metadata reported by the compression service alongside an image.
///
/// Every field has a default, so parsing never fails: missing or
/// unparsable numbers become `0` and a missing location stays `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    /// Media type of the image (`content-type`)
    pub media_type: String,

    /// Size in bytes (`content-length`)
    pub size: u64,

    /// Width in pixels (`image-width`)
    pub width: u32,

    /// Height in pixels (`image-height`)
    pub height: u32,

    /// URL of the stored result on the service (`location`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Number of compressions made with the API key this month
    /// (`compression-count`)
    #[serde(default)]
    pub compression_count: u64,
}

impl Metadata {
    /// Builds metadata from response headers.
    ///
    /// Header names are matched case-insensitively. When a name repeats,
    /// the first value wins.
    ///
    /// # Example
    /// ```
    /// use tinify_core::Metadata;
    ///
    /// let meta = Metadata::from_headers([
    ///     ("Content-Type", "image/png"),
    ///     ("Image-Width", "200"),
    /// ]);
    /// assert_eq!(meta.media_type, "image/png");
    /// assert_eq!(meta.width, 200);
    /// assert_eq!(meta.compression_count, 0);
    /// ```
    pub fn from_headers<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut normalized: HashMap<String, String> = HashMap::new();
        for (name, value) in headers {
            normalized
                .entry(name.as_ref().trim().to_ascii_lowercase())
                .or_insert_with(|| value.as_ref().trim().to_string());
        }

        let number = |name: &str| {
            normalized
                .get(name)
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(0)
        };
        let dimension = |name: &str| {
            normalized
                .get(name)
                .and_then(|value| value.parse::<u32>().ok())
                .unwrap_or(0)
        };

        Self {
            media_type: normalized.get("content-type").cloned().unwrap_or_default(),
            size: number("content-length"),
            width: dimension("image-width"),
            height: dimension("image-height"),
            location: normalized
                .get("location")
                .filter(|value| !value.is_empty())
                .cloned(),
            compression_count: number("compression-count"),
        }
    }
}

/// A compressed image returned by the service: bytes plus metadata.
///
/// Sources are immutable. Operations that fetch or transform an image
/// produce a new `Source` (or a new buffer) instead of changing this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    meta: Metadata,
    data: Vec<u8>,
}

impl Source {
    pub fn new(meta: Metadata, data: Vec<u8>) -> Self {
        Self { meta, data }
    }

    /// Builds a source from response headers and body.
    pub fn from_response<I, K, V>(headers: I, data: Vec<u8>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::new(Metadata::from_headers(headers), data)
    }

    /// Wraps local bytes that were never sent to the service.
    ///
    /// The result has no location, so fetching it again returns these
    /// bytes without any network call.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let meta = Metadata {
            size: data.len() as u64,
            ..Metadata::default()
        };
        Self::new(meta, data)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    pub fn media_type(&self) -> &str {
        &self.meta.media_type
    }

    pub fn size(&self) -> u64 {
        self.meta.size
    }

    pub fn width(&self) -> u32 {
        self.meta.width
    }

    pub fn height(&self) -> u32 {
        self.meta.height
    }

    pub fn location(&self) -> Option<&str> {
        self.meta.location.as_deref()
    }

    pub fn compression_count(&self) -> u64 {
        self.meta.compression_count
    }

    /// The bytes held by this handle.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Write the held bytes to `path`
    ///
    /// # Returns
    /// The number of bytes written
    ///
    /// # Errors
    /// The underlying `std::io::Error` if the path cannot be created or written
    pub fn to_file(&self, path: impl AsRef<Path>) -> std::io::Result<usize> {
        let path = path.as_ref();
        tracing::debug!("Writing {} bytes to: {}", self.data.len(), path.display());

        let mut file = File::create(path)?;
        file.write_all(&self.data)?;
        file.flush()?;

        Ok(self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_headers() -> Vec<(&'static str, &'static str)> {
        vec![
            ("content-type", "image/png"),
            ("content-length", "120"),
            ("image-width", "300"),
            ("image-height", "200"),
            ("location", "https://api.tinify.com/output/1"),
            ("compression-count", "5"),
        ]
    }

    #[test]
    fn test_accessors() {
        let source = Source::from_response(full_headers(), b"image-data".to_vec());

        assert_eq!(source.as_bytes(), b"image-data");
        assert_eq!(source.size(), 120);
        assert_eq!(source.media_type(), "image/png");
        assert_eq!(source.width(), 300);
        assert_eq!(source.height(), 200);
        assert_eq!(source.location(), Some("https://api.tinify.com/output/1"));
        assert_eq!(source.compression_count(), 5);
    }

    #[test]
    fn test_compression_count_defaults_to_zero() {
        let source = Source::from_response(
            [
                ("content-type", "image/png"),
                ("content-length", "1"),
                ("image-width", "1"),
                ("image-height", "1"),
            ],
            b"x".to_vec(),
        );

        assert_eq!(source.compression_count(), 0);
        assert_eq!(source.location(), None);
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let meta = Metadata::from_headers([
            ("Content-Type", "image/webp"),
            ("IMAGE-WIDTH", "64"),
            ("Image-Height", "32"),
            ("Location", "https://api.tinify.com/output/2"),
            ("Compression-Count", "3"),
        ]);

        assert_eq!(meta.media_type, "image/webp");
        assert_eq!(meta.width, 64);
        assert_eq!(meta.height, 32);
        assert_eq!(meta.location.as_deref(), Some("https://api.tinify.com/output/2"));
        assert_eq!(meta.compression_count, 3);
    }

    #[test]
    fn test_first_value_wins() {
        let meta = Metadata::from_headers([
            ("content-type", "image/png"),
            ("Content-Type", "text/plain"),
        ]);
        assert_eq!(meta.media_type, "image/png");
    }

    #[test]
    fn test_missing_and_unparsable_values_default() {
        let meta = Metadata::from_headers([("content-length", "lots"), ("image-width", "-4")]);

        assert_eq!(meta, Metadata::default());
        assert_eq!(meta.media_type, "");
    }

    #[test]
    fn test_from_bytes_has_no_location() {
        let source = Source::from_bytes(b"local".to_vec());
        assert_eq!(source.location(), None);
        assert_eq!(source.size(), 5);
        assert_eq!(source.into_bytes(), b"local".to_vec());
    }

    #[test]
    fn test_to_file_writes_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let source = Source::from_response([("content-length", "4")], b"data".to_vec());

        let written = source.to_file(&path).unwrap();

        assert_eq!(written, 4);
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn test_to_file_propagates_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let source = Source::from_bytes(b"data".to_vec());

        let err = source.to_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_metadata_serialization() {
        let meta = Metadata::from_headers(full_headers());
        let json = serde_json::to_string(&meta).unwrap();
        let deserialized: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(meta, deserialized);
    }
}
