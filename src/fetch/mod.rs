//! HTTP fetch layer
//!
//! Issues timed, header-customized GET requests for sitemap documents and
//! robots.txt files, transparently decompressing gzip-packed sitemap feeds
//! and surfacing transport failures as typed errors instead of aborting
//! the crawl.

mod client;
mod fetcher;

pub use client::build_http_client;
pub use fetcher::{fetch_document, FetchError, FetchedDocument};
