use crate::config::types::{Config, CrawlConfig, FetchConfig, SanitizerConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_crawl_config(&config.crawl)?;
    validate_sanitizer_config(&config.sanitizer)?;
    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("page_timeout_secs", config.page_timeout_secs),
        ("sitemap_timeout_secs", config.sitemap_timeout_secs),
        ("connect_timeout_secs", config.connect_timeout_secs),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 32 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 32, got {}",
            config.concurrency
        )));
    }

    if config.sitemap_max_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "sitemap_max_depth must be >= 1, got {}",
            config.sitemap_max_depth
        )));
    }

    if let Some(empty) = config.keywords.iter().find(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "keywords cannot contain blank entries, got '{}'",
            empty
        )));
    }

    Ok(())
}

/// Validates sanitizer thresholds
fn validate_sanitizer_config(config: &SanitizerConfig) -> Result<(), ConfigError> {
    if !(config.structural_link_density > 0.0 && config.structural_link_density <= 1.0) {
        return Err(ConfigError::Validation(format!(
            "structural_link_density must be in (0, 1], got {}",
            config.structural_link_density
        )));
    }

    if config.structural_max_text == 0 || config.selector_max_text == 0 {
        return Err(ConfigError::Validation(
            "text thresholds must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
