//! Core data model: crawl targets, fetched sitemap documents, and the flat
//! URL record table handed to the persistence collaborator.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

use crate::MediaeyeError;

/// External-facing input for one crawl: the newspaper's base URL plus
/// optional incremental-crawl parameters.
///
/// Supplied by the orchestration collaborator per newspaper entity; not
/// persisted by this crate.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    /// Base URL: either a site root, a robots.txt URL, or a sitemap URL
    pub base_url: String,

    /// Watermark timestamp of the previous crawl; rows and sub-sitemaps
    /// strictly older than this are skipped
    pub last_scraped: Option<DateTime<Utc>>,

    /// Override for the bounded worker pool width
    pub max_workers: Option<usize>,
}

impl CrawlTarget {
    /// Creates a target for a full (non-incremental) crawl
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            last_scraped: None,
            max_workers: None,
        }
    }

    /// Sets the last-scraped watermark for an incremental re-crawl
    pub fn with_watermark(mut self, watermark: DateTime<Utc>) -> Self {
        self.last_scraped = Some(watermark);
        self
    }

    /// Overrides the worker pool width
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers);
        self
    }

    /// Validates the target before any network activity.
    ///
    /// This is the only synchronous failure path: a blank or unparseable
    /// base URL is rejected here, every later failure is recorded as an
    /// error row in the result table instead.
    pub fn validate(&self) -> Result<Url, MediaeyeError> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(MediaeyeError::InvalidTarget(
                "base URL is empty".to_string(),
            ));
        }
        Url::parse(trimmed)
            .map_err(|e| MediaeyeError::InvalidTarget(format!("{}: {}", trimmed, e)))
    }
}

/// Discriminator for a fetched sitemap document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// A sitemap index whose entries point at other sitemaps
    Index,
    /// A leaf sitemap whose entries are content URLs
    UrlSet,
    /// A document that failed XML parsing or had an unexpected root
    Malformed,
}

/// One fetched sitemap document, created per fetch attempt and discarded
/// after its rows are merged into the aggregate. Never mutated.
#[derive(Debug, Clone)]
pub struct SitemapNode {
    /// URL the document was fetched from
    pub url: String,

    /// Index, urlset, or malformed
    pub kind: SitemapKind,

    /// Size of the raw (pre-decompression) response body in bytes
    pub raw_bytes: usize,

    /// UTC timestamp of the fetch
    pub fetched_at: DateTime<Utc>,

    /// ETag response header, when the server sent one
    pub etag: Option<String>,

    /// Last-Modified response header, when the server sent one
    pub last_modified: Option<DateTime<Utc>>,
}

impl SitemapNode {
    /// Raw document size in megabytes, as recorded on every output row
    pub fn size_mb(&self) -> f64 {
        self.raw_bytes as f64 / 1024.0 / 1024.0
    }
}

/// Content category assigned to a discovered URL by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Article-like content, either from the known-section vocabulary or
    /// the optimistic default for unrecognized sections
    Article,
    /// Staff or author profile pages
    Staff,
    /// Advertisement or sponsored content
    Advertisement,
    /// Tag listing pages
    Tag,
    /// Root-level URL with no path segments to classify
    MissingSegment,
}

impl Category {
    /// Returns the string form used in the output table
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Article => "article",
            Category::Staff => "staff",
            Category::Advertisement => "advertisement",
            Category::Tag => "tag",
            Category::MissingSegment => "missing_segment",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the consolidated crawl result.
///
/// Regular rows carry a discovered URL plus sitemap metadata and, once the
/// classifier has run, a category judgment. Error rows carry only the
/// originating sitemap URL and an error message, so a consumer can audit
/// partial failures without the crawl having dropped that branch silently.
#[derive(Debug, Clone, Serialize)]
pub struct UrlRecord {
    /// Canonical discovered URL; `None` only on error rows
    pub url: Option<String>,

    /// Declared last-modified timestamp, parsed best-effort to UTC
    pub lastmod: Option<DateTime<Utc>>,

    /// Declared priority, parsed best-effort
    pub priority: Option<f64>,

    /// URL of the sitemap document this row came from
    pub sitemap: String,

    /// First path segment, the primary classification key
    pub dir_1: Option<String>,
    pub dir_2: Option<String>,
    pub dir_3: Option<String>,
    pub dir_4: Option<String>,
    pub dir_5: Option<String>,

    /// Terminal path segment
    pub last_dir: Option<String>,

    /// Category assigned by the classifier
    pub filter_status: Option<Category>,

    /// True once a confident category decision has been made
    pub is_filtered: Option<bool>,

    /// UTC timestamp of classification
    pub time_filtered: Option<DateTime<Utc>>,

    /// UTC timestamp of the sitemap fetch
    pub download_date: DateTime<Utc>,

    /// Raw size of the source sitemap document in megabytes
    pub sitemap_size_mb: f64,

    /// ETag header of the source sitemap response
    pub etag: Option<String>,

    /// Last-Modified header of the source sitemap response
    pub sitemap_last_modified: Option<DateTime<Utc>>,

    /// Fetch or parse failure message; non-null marks an error row
    pub errors: Option<String>,

    /// Any additional sitemap tags, flattened with ancestor-tag prefixes
    /// (e.g. `news_publication_name`)
    pub extra: BTreeMap<String, String>,
}

impl UrlRecord {
    /// Creates a blank row attached to a source sitemap
    pub fn new(sitemap: impl Into<String>) -> Self {
        Self {
            url: None,
            lastmod: None,
            priority: None,
            sitemap: sitemap.into(),
            dir_1: None,
            dir_2: None,
            dir_3: None,
            dir_4: None,
            dir_5: None,
            last_dir: None,
            filter_status: None,
            is_filtered: None,
            time_filtered: None,
            download_date: Utc::now(),
            sitemap_size_mb: 0.0,
            etag: None,
            sitemap_last_modified: None,
            errors: None,
            extra: BTreeMap::new(),
        }
    }

    /// Creates an error row for a sitemap that failed to fetch or parse
    pub fn error_row(sitemap: impl Into<String>, message: impl Into<String>) -> Self {
        let mut row = Self::new(sitemap);
        row.errors = Some(message.into());
        row
    }

    /// True when this row records a failure rather than a discovered URL
    pub fn is_error(&self) -> bool {
        self.errors.is_some()
    }
}
