//! Configuration module for mediaeye
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files covering the fetch policy (worker width, timeouts, user agent
//! identity) and the category vocabulary tables. Everything has a built-in
//! default, so `Config::default()` is a fully working configuration.
//!
//! # Example
//!
//! ```no_run
//! use mediaeye::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Worker pool width: {}", config.fetch.max_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, UserAgentConfig, VocabularyConfig};

// Re-export parser functions
pub use parser::{default_config, load_config};
