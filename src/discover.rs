//! Crawl orchestration
//!
//! The library entry point: resolve a target's sitemap tree, aggregate the
//! merged rows, classify every discovered URL, and hand the table to the
//! persistence collaborator. One call covers one newspaper.

use futures::future;
use reqwest::Client;
use url::Url;

use crate::classify::{apply_filter_status, Vocabulary};
use crate::config::Config;
use crate::model::{CrawlTarget, UrlRecord};
use crate::sitemap::{aggregate, is_robots_url, resolve};
use crate::store::{ArticleStore, StoreResult};
use crate::Result;

/// Discovers and classifies every candidate URL for one crawl target
///
/// Control flow: resolve robots.txt / sitemap tree, aggregate duplicates,
/// apply the classifier to every non-error row. A bare site URL (no
/// robots.txt or sitemap path) is expanded into both conventional
/// locations; aggregation collapses any overlap between the two trees.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `config` - Fetch policy and vocabulary configuration
/// * `target` - The newspaper's crawl target
///
/// # Returns
///
/// The consolidated, classified result table, error rows included.
pub async fn discover(
    client: &Client,
    config: &Config,
    target: &CrawlTarget,
) -> Result<Vec<UrlRecord>> {
    let base = target.validate()?;

    // Both conventional seeds crawl concurrently, each tree under its own
    // bounded worker pool
    let seeds: Vec<CrawlTarget> = seed_targets(&base)
        .into_iter()
        .map(|seed| CrawlTarget {
            base_url: seed,
            last_scraped: target.last_scraped,
            max_workers: target.max_workers,
        })
        .collect();
    let trees = future::try_join_all(
        seeds.iter().map(|seeded| resolve(client, config, seeded)),
    )
    .await?;

    let mut rows = aggregate(trees.into_iter().flatten().collect());

    let vocabulary = Vocabulary::from_config(&config.vocabulary);
    apply_filter_status(&mut rows, &vocabulary);

    tracing::info!(
        "Discovered {} rows ({} errors) for {}",
        rows.len(),
        rows.iter().filter(|r| r.is_error()).count(),
        target.base_url
    );

    Ok(rows)
}

/// Expands a validated base URL into concrete crawl seeds
///
/// An explicit robots.txt or sitemap URL is used as-is. A bare site URL
/// tries both conventional locations, since either may exist alone.
fn seed_targets(base: &Url) -> Vec<String> {
    let base_str = base.as_str();

    if is_robots_url(base_str) || looks_like_sitemap(base) {
        return vec![base_str.to_string()];
    }

    // Joining against a directory path needs the trailing slash
    let mut dir = base.clone();
    if !dir.path().ends_with('/') {
        dir.set_path(&format!("{}/", dir.path()));
    }

    ["robots.txt", "sitemap.xml"]
        .iter()
        .filter_map(|name| dir.join(name).ok())
        .map(|u| u.to_string())
        .collect()
}

fn looks_like_sitemap(url: &Url) -> bool {
    let path = url.path();
    path.ends_with(".xml") || path.ends_with(".xml.gz") || path.contains("sitemap")
}

/// Hands the classified table to the persistence collaborator
///
/// Error rows and rows without a URL identity are filtered out; the store's
/// own uniqueness constraint makes resubmission safe.
///
/// # Returns
///
/// The number of rows the store reports as newly inserted
pub fn persist_candidates(
    store: &mut dyn ArticleStore,
    rows: &[UrlRecord],
) -> StoreResult<usize> {
    let candidates: Vec<UrlRecord> = rows
        .iter()
        .filter(|r| !r.is_error() && r.url.is_some())
        .cloned()
        .collect();

    let inserted = store.insert_article_candidates(&candidates)?;
    tracing::info!(
        "{} of {} candidate rows newly inserted",
        inserted,
        candidates.len()
    );
    Ok(inserted)
}
