//! Mediaeye: sitemap discovery and URL classification for student newspapers
//!
//! This crate takes a newspaper's base site URL, walks its robots.txt and
//! sitemap-index tree, flattens the discovered URLs into a single table
//! enriched with path-segment metadata, and classifies each URL into a
//! content category (article, staff, advertisement, tag) using table-driven
//! path vocabularies. Persistence and newspaper resolution are collaborator
//! traits; this crate performs no database access itself.

pub mod classify;
pub mod config;
pub mod discover;
pub mod fetch;
pub mod model;
pub mod sitemap;
pub mod store;

use thiserror::Error;

/// Main error type for mediaeye operations
#[derive(Debug, Error)]
pub enum MediaeyeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid crawl target: {0}")]
    InvalidTarget(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Sitemap parse error: {0}")]
    Parse(#[from] sitemap::ParseError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for mediaeye operations
pub type Result<T> = std::result::Result<T, MediaeyeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use classify::{classify, segment_url, Vocabulary};
pub use config::Config;
pub use discover::discover;
pub use model::{Category, CrawlTarget, UrlRecord};
pub use sitemap::resolve;
