//! Result aggregation
//!
//! Merges the rows of every resolved sitemap into one table: duplicate URLs
//! collapse to a single record (first occurrence wins for static fields,
//! `lastmod` takes the maximum observed value), error rows pass through
//! untouched, and input order is preserved so first-occurrence-wins stays
//! meaningful.

use std::collections::HashMap;

use crate::model::UrlRecord;

/// Deduplicates resolver output by canonical URL
///
/// The persistence collaborator separately enforces a uniqueness constraint
/// on URL; this pass guarantees the handed-off table already satisfies it.
///
/// # Arguments
///
/// * `rows` - Merged rows from every resolved sitemap, source order intact
///
/// # Returns
///
/// One row per distinct URL plus every error row, in first-seen order
pub fn aggregate(rows: Vec<UrlRecord>) -> Vec<UrlRecord> {
    let mut out: Vec<UrlRecord> = Vec::with_capacity(rows.len());
    // Maps a canonical URL to its index in `out`
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let Some(url) = row.url.clone() else {
            // Error rows have no URL identity to deduplicate on
            out.push(row);
            continue;
        };

        match first_seen.get(&url) {
            None => {
                first_seen.insert(url, out.len());
                out.push(row);
            }
            Some(&index) => {
                let kept = &mut out[index];
                kept.lastmod = match (kept.lastmod, row.lastmod) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    (a, b) => a.or(b),
                };
            }
        }
    }

    out
}
