use crate::config::types::{Config, FetchConfig, UserAgentConfig, VocabularyConfig};
use crate::ConfigError;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_vocabulary_config(&config.vocabulary)?;
    Ok(())
}

/// Validates fetch policy configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_workers < 1 || config.max_workers > 64 {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and 64, got {}",
            config.max_workers
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.recursive_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "recursive_timeout_secs must be >= 1, got {}",
            config.recursive_timeout_secs
        )));
    }

    if config.recursive_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "recursive_timeout_secs ({}) must not exceed timeout_secs ({})",
            config.recursive_timeout_secs, config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens, \
             and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the category vocabulary tables.
///
/// Lookup order (tag, then ad, then staff, then article) would mask a
/// segment listed in two tables, so overlap is rejected outright rather
/// than resolved by precedence.
fn validate_vocabulary_config(config: &VocabularyConfig) -> Result<(), ConfigError> {
    let tables: [(&str, &[String]); 4] = [
        ("tag-dirs", &config.tag_dirs),
        ("ad-dirs", &config.ad_dirs),
        ("staff-dirs", &config.staff_dirs),
        ("article-dirs", &config.article_dirs),
    ];

    for (name, dirs) in &tables {
        if dirs.is_empty() {
            return Err(ConfigError::Validation(format!(
                "vocabulary table {} cannot be empty",
                name
            )));
        }
        for dir in dirs.iter() {
            if dir.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "vocabulary table {} contains a blank segment",
                    name
                )));
            }
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (name, dirs) in &tables {
        for dir in dirs.iter() {
            if !seen.insert(dir.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "segment '{}' appears in more than one vocabulary table ({})",
                    dir, name
                )));
            }
        }
    }

    if config.article_year_min > config.article_year_max {
        return Err(ConfigError::Validation(format!(
            "article_year_min ({}) must not exceed article_year_max ({})",
            config.article_year_min, config.article_year_max
        )));
    }

    if config.article_year_min < 1000 || config.article_year_max > 9999 {
        return Err(ConfigError::Validation(
            "article year range must stay within four-digit years".to_string(),
        ));
    }

    Ok(())
}
