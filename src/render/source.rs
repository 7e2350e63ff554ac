//! Image loading: fetches logo sources from URLs, data URIs, or disk.
//!
//! `ImageLoader` owns the HTTP client so repeated conversions share one
//! connection pool. Every failure surfaces as [`PrintError::ImageLoad`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use percent_encoding::percent_decode_str;

use crate::error::PrintError;

/// Where a logo comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// `http://` or `https://` URL
    Remote(&'a str),
    /// `data:[<mediatype>][;base64],<payload>`
    DataUri(&'a str),
    /// `file://` URL or bare filesystem path
    File(&'a str),
}

impl<'a> ImageSource<'a> {
    /// Classify a source string by its scheme. Schemes are case-insensitive.
    pub fn parse(source: &'a str) -> Self {
        if has_scheme(source, "http://") || has_scheme(source, "https://") {
            Self::Remote(source)
        } else if has_scheme(source, "data:") {
            Self::DataUri(source)
        } else if has_scheme(source, "file://") {
            Self::File(&source["file://".len()..])
        } else {
            Self::File(source)
        }
    }
}

fn has_scheme(source: &str, scheme: &str) -> bool {
    source
        .get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

/// Loads and decodes source images.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    http_client: reqwest::Client,
}

impl ImageLoader {
    /// Create a loader with its own HTTP client.
    pub fn new() -> Result<Self, PrintError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("washprint/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PrintError::ImageLoad(format!("HTTP client error: {}", e)))?;
        Ok(Self { http_client })
    }

    /// Create a loader around an existing client.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Fetch and decode an image.
    pub async fn load(&self, source: &str) -> Result<DynamicImage, PrintError> {
        if source.is_empty() {
            return Err(PrintError::ImageLoad("empty image source".to_string()));
        }

        let bytes = match ImageSource::parse(source) {
            ImageSource::Remote(url) => self.download(url).await?,
            ImageSource::DataUri(uri) => decode_data_uri(uri)?,
            ImageSource::File(path) => tokio::fs::read(path)
                .await
                .map_err(|e| PrintError::ImageLoad(format!("Failed to read {}: {}", path, e)))?,
        };

        image::load_from_memory(&bytes)
            .map_err(|e| PrintError::ImageLoad(format!("Failed to decode image: {}", e)))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, PrintError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PrintError::ImageLoad(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(PrintError::ImageLoad(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PrintError::ImageLoad(format!("Failed to read image data: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// Extract the payload of a `data:` URI (RFC 2397).
///
/// The payload is percent-decoded, then base64-decoded when the media type
/// ends in `;base64`.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, PrintError> {
    if !has_scheme(uri, "data:") {
        return Err(PrintError::ImageLoad("not a data URI".to_string()));
    }
    let (meta, payload) = uri["data:".len()..]
        .split_once(',')
        .ok_or_else(|| PrintError::ImageLoad("data URI has no payload".to_string()))?;
    let bytes: Vec<u8> = percent_decode_str(payload).collect();

    let is_base64 = meta
        .rsplit(';')
        .next()
        .is_some_and(|param| param.trim().eq_ignore_ascii_case("base64"));
    if !is_base64 {
        return Ok(bytes);
    }

    let encoded: Vec<u8> = bytes
        .into_iter()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(encoded)
        .map_err(|e| PrintError::ImageLoad(format!("Invalid base64 in data URI: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources() {
        assert_eq!(
            ImageSource::parse("https://example.com/logo.png"),
            ImageSource::Remote("https://example.com/logo.png")
        );
        assert_eq!(
            ImageSource::parse("http://example.com/logo.png"),
            ImageSource::Remote("http://example.com/logo.png")
        );
        assert_eq!(
            ImageSource::parse("data:image/png;base64,AAAA"),
            ImageSource::DataUri("data:image/png;base64,AAAA")
        );
        assert_eq!(
            ImageSource::parse("file:///tmp/logo.png"),
            ImageSource::File("/tmp/logo.png")
        );
        assert_eq!(ImageSource::parse("logo.png"), ImageSource::File("logo.png"));
    }

    #[test]
    fn test_parse_sources_ignores_scheme_case() {
        assert_eq!(
            ImageSource::parse("HTTPS://example.com/logo.png"),
            ImageSource::Remote("HTTPS://example.com/logo.png")
        );
        assert_eq!(
            ImageSource::parse("Data:image/png;base64,AAAA"),
            ImageSource::DataUri("Data:image/png;base64,AAAA")
        );
        assert_eq!(
            ImageSource::parse("FILE:///tmp/logo.png"),
            ImageSource::File("/tmp/logo.png")
        );
        // shorter than any scheme, or split inside a multi-byte char
        assert_eq!(ImageSource::parse("a.png"), ImageSource::File("a.png"));
        assert_eq!(ImageSource::parse("abcdé.png"), ImageSource::File("abcdé.png"));
    }

    #[test]
    fn test_decode_base64_data_uri() {
        let bytes = decode_data_uri("data:image/png;base64,AQID").unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_plain_data_uri() {
        let bytes = decode_data_uri("data:text/plain,hello").unwrap();
        assert_eq!(bytes, b"hello".to_vec());
    }

    #[test]
    fn test_decode_percent_encoded_data_uri() {
        let bytes = decode_data_uri("data:text/plain,a%20b%89%50%4e%47").unwrap();
        assert_eq!(bytes, vec![b'a', b' ', b'b', 0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_decode_base64_with_escapes_and_case() {
        // %3D is '=' padding
        let bytes = decode_data_uri("DATA:image/png;BASE64,AQI%3D").unwrap();
        assert_eq!(bytes, vec![1, 2]);
    }

    #[test]
    fn test_decode_data_uri_without_payload() {
        let err = decode_data_uri("data:image/png;base64").unwrap_err();
        assert!(matches!(err, PrintError::ImageLoad(_)));
    }

    #[test]
    fn test_decode_invalid_base64() {
        let err = decode_data_uri("data:image/png;base64,!!!").unwrap_err();
        assert!(matches!(err, PrintError::ImageLoad(_)));
    }

    #[tokio::test]
    async fn test_load_empty_source() {
        let loader = ImageLoader::new().unwrap();
        let err = loader.load("").await.unwrap_err();
        assert!(matches!(err, PrintError::ImageLoad(_)));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let loader = ImageLoader::new().unwrap();
        let err = loader
            .load("/nonexistent/washprint/logo.png")
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::ImageLoad(_)));
    }

    #[tokio::test]
    async fn test_load_undecodable_data_uri() {
        let loader = ImageLoader::new().unwrap();
        let err = loader
            .load("data:image/png;base64,AQID")
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::ImageLoad(_)));
    }
}
