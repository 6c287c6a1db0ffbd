//! HTTP client construction
//!
//! Builds the shared reqwest client with a descriptive user agent string.
//! Per-request timeouts are applied at the request level by the fetcher,
//! since top-level and recursive fetches use different budgets.

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;

/// Formats the user agent string from the identity configuration.
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`; the contact
/// parenthetical is omitted when no contact details are configured.
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    if config.contact_url.is_empty() && config.contact_email.is_empty() {
        format!("{}/{}", config.crawler_name, config.crawler_version)
    } else {
        format!(
            "{}/{} (+{}; {})",
            config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
        )
    }
}

/// Builds the shared HTTP client
///
/// # Arguments
///
/// * `config` - The user agent identity configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .build()
}
