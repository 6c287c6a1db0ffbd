//! Recursive sitemap resolver
//!
//! Walks a target's sitemap tree: robots.txt directives feed sitemap URLs,
//! sitemap indices feed child sitemaps, leaf urlsets feed URL rows. The
//! traversal is an explicit work queue driven through a bounded worker pool
//! rather than recursive calls, which keeps stack depth constant and makes
//! the self-reference guard a set-membership check on already-dispatched
//! URLs.
//!
//! Failure policy: a fetch or parse failure of any single sitemap becomes a
//! one-row error record in the merged result. Siblings keep crawling and
//! the overall call completes; only a malformed [`CrawlTarget`] fails
//! synchronously before any network activity.

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use crate::config::Config;
use crate::fetch::{fetch_document, FetchError};
use crate::model::{CrawlTarget, SitemapNode, UrlRecord};
use crate::sitemap::parser::{parse_sitemap, ParsedSitemap, SitemapEntry};
use crate::sitemap::robots::{is_robots_url, sitemaps_from_robots};
use crate::Result;

/// Warning message recorded when a sitemap index lists itself as a child
const SELF_REFERENCE_WARNING: &str = "WARNING: Sitemap contains a link to itself";

/// Outcome of processing one sitemap node inside the worker pool
enum Outcome {
    /// robots.txt yielded these declared sitemap URLs
    Robots(Vec<String>),
    /// A sitemap document parsed successfully
    Parsed(SitemapNode, ParsedSitemap),
    /// Fetch or parse failed; becomes a single error row
    Failed(String),
}

struct TaskResult {
    url: String,
    outcome: Outcome,
}

/// Resolves a crawl target into the flat, unclassified result table
///
/// The target URL may be a robots.txt URL, a sitemap index, or a leaf
/// sitemap; the resolver follows whatever tree it finds. Rows keep their
/// source-document order; sibling documents merge in completion order.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `config` - Fetch policy (worker width, timeouts)
/// * `target` - Base URL plus optional watermark and worker override
///
/// # Returns
///
/// All discovered URL rows plus one error row per failed sitemap node.
pub async fn resolve(
    client: &Client,
    config: &Config,
    target: &CrawlTarget,
) -> Result<Vec<UrlRecord>> {
    target.validate()?;

    let max_workers = target.max_workers.unwrap_or(config.fetch.max_workers).max(1);
    let semaphore = Arc::new(Semaphore::new(max_workers));
    let top_timeout = Duration::from_secs(config.fetch.timeout_secs);
    let child_timeout = Duration::from_secs(config.fetch.recursive_timeout_secs);

    let root_url = target.base_url.trim().to_string();
    let watermark = target.last_scraped;

    let mut rows: Vec<UrlRecord> = Vec::new();
    let mut dispatched: HashSet<String> = HashSet::new();
    let mut tasks: JoinSet<TaskResult> = JoinSet::new();

    // The direct-sitemap watermark pre-filter applies before the first fetch
    if !watermark_allows(&root_url, watermark) {
        tracing::info!("Ignoring sitemap {} due to date filter", root_url);
        return Ok(rows);
    }

    dispatched.insert(root_url.clone());
    tasks.spawn(process_node(
        client.clone(),
        Arc::clone(&semaphore),
        root_url,
        top_timeout,
    ));

    while let Some(joined) = tasks.join_next().await {
        let TaskResult { url, outcome } = joined?;

        match outcome {
            Outcome::Robots(sitemaps) => {
                for sitemap in sitemaps {
                    dispatch_child(
                        &sitemap,
                        watermark,
                        &mut dispatched,
                        &mut tasks,
                        client,
                        &semaphore,
                        child_timeout,
                    );
                }
            }
            Outcome::Parsed(node, ParsedSitemap::Index(children)) => {
                for child in children {
                    if child == node.url {
                        tracing::warn!("Sitemap {} lists itself as a child", node.url);
                        rows.push(UrlRecord::error_row(&node.url, SELF_REFERENCE_WARNING));
                    } else {
                        dispatch_child(
                            &child,
                            watermark,
                            &mut dispatched,
                            &mut tasks,
                            client,
                            &semaphore,
                            child_timeout,
                        );
                    }
                }
            }
            Outcome::Parsed(node, ParsedSitemap::UrlSet(entries)) => {
                tracing::info!("Collected {} URLs from {}", entries.len(), node.url);
                rows.extend(entries_to_records(entries, &node, watermark));
            }
            Outcome::Failed(message) => {
                tracing::warn!("Error while accessing {}: {}", url, message);
                rows.push(UrlRecord::error_row(&url, message));
            }
        }
    }

    Ok(rows)
}

/// Queues a child sitemap unless it was already dispatched or is filtered
/// out by the watermark's date-parameter heuristic
fn dispatch_child(
    child: &str,
    watermark: Option<DateTime<Utc>>,
    dispatched: &mut HashSet<String>,
    tasks: &mut JoinSet<TaskResult>,
    client: &Client,
    semaphore: &Arc<Semaphore>,
    timeout: Duration,
) {
    if !watermark_allows(child, watermark) {
        tracing::info!("Ignoring sitemap {} due to date filter", child);
        return;
    }
    if !dispatched.insert(child.to_string()) {
        tracing::debug!("Skipping already dispatched sitemap {}", child);
        return;
    }
    tasks.spawn(process_node(
        client.clone(),
        Arc::clone(semaphore),
        child.to_string(),
        timeout,
    ));
}

/// Fetches and parses one sitemap node under a worker pool permit
async fn process_node(
    client: Client,
    semaphore: Arc<Semaphore>,
    url: String,
    timeout: Duration,
) -> TaskResult {
    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            return TaskResult {
                outcome: Outcome::Failed("worker pool closed".to_string()),
                url,
            };
        }
    };

    let doc = match fetch_document(&client, &url, timeout).await {
        Ok(doc) => doc,
        // A site without robots.txt is normal, not a crawl failure
        Err(FetchError::Status { status: 404, .. }) if is_robots_url(&url) => {
            tracing::debug!("No robots.txt at {}", url);
            return TaskResult {
                outcome: Outcome::Robots(Vec::new()),
                url,
            };
        }
        Err(e) => {
            return TaskResult {
                outcome: Outcome::Failed(e.to_string()),
                url,
            };
        }
    };

    if is_robots_url(&url) {
        let content = String::from_utf8_lossy(&doc.body);
        return TaskResult {
            outcome: Outcome::Robots(sitemaps_from_robots(&content)),
            url,
        };
    }

    match parse_sitemap(&doc.body) {
        Ok(parsed) => {
            let node = SitemapNode {
                url: url.clone(),
                kind: parsed.kind(),
                raw_bytes: doc.raw_bytes,
                fetched_at: doc.fetched_at,
                etag: doc.etag,
                last_modified: doc.last_modified,
            };
            TaskResult {
                outcome: Outcome::Parsed(node, parsed),
                url,
            }
        }
        Err(e) => TaskResult {
            outcome: Outcome::Failed(e.to_string()),
            url,
        },
    }
}

/// URL-level watermark pre-filter.
///
/// Incrementally versioned feeds encode a `date=YYYY-MM-DD` query
/// parameter; when that date is strictly older than the watermark the fetch
/// is skipped outright. This is the cheap first layer; the precise
/// row-level `lastmod` filter still runs after the fetch.
fn watermark_allows(sitemap_url: &str, watermark: Option<DateTime<Utc>>) -> bool {
    let Some(watermark) = watermark else {
        return true;
    };
    let Ok(parsed) = Url::parse(sitemap_url) else {
        return true;
    };
    for (key, value) in parsed.query_pairs() {
        if key == "date" {
            if let Ok(date) = NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
                let date_utc = date
                    .and_hms_opt(0, 0, 0)
                    .map(|naive| naive.and_utc())
                    .unwrap_or(watermark);
                if date_utc < watermark {
                    return false;
                }
            }
            // Unparseable date parameters are ignored and the fetch proceeds
        }
    }
    true
}

/// Converts urlset entries into output rows, applying the row-level
/// watermark filter and stamping per-document bookkeeping on every row
fn entries_to_records(
    entries: Vec<SitemapEntry>,
    node: &SitemapNode,
    watermark: Option<DateTime<Utc>>,
) -> Vec<UrlRecord> {
    let mut rows = Vec::with_capacity(entries.len());

    for entry in entries {
        let mut extra = entry.extra;

        let lastmod = extra.remove("lastmod").and_then(|raw| {
            let parsed = parse_lastmod(&raw);
            if parsed.is_none() {
                tracing::debug!("Unparseable lastmod '{}' in {}", raw, node.url);
            }
            parsed
        });

        // Rows strictly older than the watermark are already known
        if let (Some(watermark), Some(lastmod)) = (watermark, lastmod) {
            if lastmod < watermark {
                continue;
            }
        }

        let priority = extra.remove("priority").and_then(|raw| {
            let parsed = raw.trim().parse::<f64>().ok();
            if parsed.is_none() {
                tracing::debug!("Unparseable priority '{}' in {}", raw, node.url);
            }
            parsed
        });

        let mut row = UrlRecord::new(&node.url);
        row.url = Some(entry.loc);
        row.lastmod = lastmod;
        row.priority = priority;
        row.download_date = node.fetched_at;
        row.sitemap_size_mb = node.size_mb();
        row.etag = node.etag.clone();
        row.sitemap_last_modified = node.last_modified;
        row.extra = extra;
        rows.push(row);
    }

    rows
}

/// Best-effort lastmod parsing: RFC 3339 first, then the common date-only
/// and space-separated forms. Unparseable values become `None`, never a
/// row failure.
fn parse_lastmod(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}
