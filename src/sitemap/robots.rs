//! Sitemap discovery from robots.txt
//!
//! robots.txt is only consulted for its `Sitemap:` directives here; the
//! allow/disallow rules are irrelevant to sitemap traversal. The directive
//! key is case-insensitive and may appear any number of times, once per
//! declared sitemap.

/// Extracts every `Sitemap:` directive value from robots.txt content
///
/// A missing or empty robots.txt simply yields an empty list; that is an
/// expected outcome, not a failure.
///
/// # Arguments
///
/// * `content` - The raw robots.txt file content
///
/// # Returns
///
/// The declared sitemap URLs, in file order
pub fn sitemaps_from_robots(content: &str) -> Vec<String> {
    let mut sitemaps = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = trimmed.split_once(':') {
            if key.trim().eq_ignore_ascii_case("sitemap") {
                let value = value.trim();
                if !value.is_empty() {
                    sitemaps.push(value.to_string());
                }
            }
        }
    }

    sitemaps
}

/// True when the target URL points at a robots.txt file rather than a sitemap
pub fn is_robots_url(url: &str) -> bool {
    url.trim_end_matches('/').ends_with("robots.txt")
}
