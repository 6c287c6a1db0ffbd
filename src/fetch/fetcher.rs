//! Single-shot sitemap document fetches
//!
//! Each fetch performs exactly one network round trip with an explicit
//! timeout. Compressed sitemap feeds (`.xml.gz`) are decompressed here so
//! the parser always sees plain XML; the response's caching headers (ETag,
//! Last-Modified) travel with the body for downstream bookkeeping.

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use reqwest::Client;
use std::io::Read;
use std::time::Duration;
use thiserror::Error;

/// A fetch failure, classified so the resolver can record it without
/// aborting sibling fetches
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection error for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Failed to decompress {url}: {message}")]
    Gzip { url: String, message: String },
}

/// One fetched document: decompressed body plus the response metadata the
/// resolver stamps onto every row of the document's result
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// URL the document was fetched from
    pub url: String,

    /// Body bytes, already decompressed when the payload was gzip
    pub body: Vec<u8>,

    /// Size of the response body as received, before decompression
    pub raw_bytes: usize,

    /// ETag response header
    pub etag: Option<String>,

    /// Last-Modified response header, parsed from its RFC 2822 form
    pub last_modified: Option<DateTime<Utc>>,

    /// UTC timestamp of the fetch
    pub fetched_at: DateTime<Utc>,
}

/// Fetches one sitemap or robots.txt document
///
/// Performs exactly one round trip. Non-2xx statuses, timeouts, and
/// connection failures are all surfaced as a distinguishable [`FetchError`];
/// the caller decides whether that becomes an error row or a hard failure.
///
/// Bodies that start with the gzip magic bytes are decompressed regardless
/// of the URL suffix; a `.gz` URL whose body is not actually gzip is passed
/// through untouched, so the XML parser reports the malformation instead of
/// this layer guessing.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - Absolute URL to fetch
/// * `timeout` - Per-request timeout (60s top-level, 15s recursive)
pub async fn fetch_document(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<FetchedDocument, FetchError> {
    tracing::debug!("Fetching {}", url);

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let etag = header_value(&response, "etag");
    let last_modified = header_value(&response, "last-modified")
        .and_then(|v| DateTime::parse_from_rfc2822(&v).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let fetched_at = Utc::now();

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    let raw_bytes = bytes.len();
    let body = decompress_if_gzip(url, &bytes)?;

    Ok(FetchedDocument {
        url: url.to_string(),
        body,
        raw_bytes,
        etag,
        last_modified,
        fetched_at,
    })
}

fn header_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn classify_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else {
        FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

/// Decompresses the body when it carries the gzip magic bytes.
///
/// Sniffing the magic bytes rather than trusting the URL suffix handles
/// both `.xml.gz` feeds served without Content-Encoding and mislabeled
/// plain-XML feeds with a `.gz` suffix.
fn decompress_if_gzip(url: &str, bytes: &[u8]) -> Result<Vec<u8>, FetchError> {
    if bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B {
        let mut decoder = GzDecoder::new(bytes);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| FetchError::Gzip {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        return Ok(out);
    }
    Ok(bytes.to_vec())
}
