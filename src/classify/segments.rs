//! URL path segmentation
//!
//! Decomposes a URL's path into ordered non-empty segments. The first
//! segment is the classifier's primary key; the first five and the terminal
//! segment are recorded on the output row.

use url::Url;

/// Ordered path segments of one URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSegments {
    segments: Vec<String>,
}

impl PathSegments {
    /// The nth path segment, 1-based to match the `dir_1..dir_5` columns
    pub fn dir(&self, n: usize) -> Option<&str> {
        if n == 0 {
            return None;
        }
        self.segments.get(n - 1).map(|s| s.as_str())
    }

    /// The terminal path segment
    pub fn last_dir(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    /// All segments in order
    pub fn all(&self) -> &[String] {
        &self.segments
    }

    /// True for root-level URLs with no path to classify
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Splits a URL's path into ordered non-empty segments
///
/// Unparseable URLs yield no segments, which downstream classification
/// treats as a missing first segment rather than a failure.
pub fn segment_url(url: &str) -> PathSegments {
    let Ok(parsed) = Url::parse(url) else {
        tracing::debug!("Failed to parse URL for segmentation: {}", url);
        return PathSegments::default();
    };

    let segments = parsed
        .path_segments()
        .map(|parts| {
            parts
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();

    PathSegments { segments }
}
