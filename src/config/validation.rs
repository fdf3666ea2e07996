use crate::config::types::{CategoryConfig, Config, CrawlerConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source(&config.source.base_url, &config.source.name)?;
    validate_crawler_config(&config.crawler)?;
    validate_categories(&config.category)?;
    validate_output(config)?;
    Ok(())
}

/// Validates the forum source settings
fn validate_source(base_url: &str, name: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if name.is_empty() {
        return Err(ConfigError::Validation(
            "source name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.pages < 1 {
        return Err(ConfigError::Validation(format!(
            "pages must be >= 1, got {}",
            config.pages
        )));
    }

    if config.max_concurrent < 1 || config.max_concurrent > 64 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent must be between 1 and 64, got {}",
            config.max_concurrent
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates category entries
fn validate_categories(categories: &[CategoryConfig]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[category]] entry is required".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for category in categories {
        if category.id.is_empty() {
            return Err(ConfigError::Validation(
                "category id cannot be empty".to_string(),
            ));
        }

        validate_category_name(&category.name)?;

        if !names.insert(category.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name '{}'",
                category.name
            )));
        }

        if let Some(pages) = category.pages {
            if pages < 1 {
                return Err(ConfigError::Validation(format!(
                    "category '{}': pages must be >= 1, got {}",
                    category.name, pages
                )));
            }
        }
    }

    Ok(())
}

/// Validates a category name for use as a file name / object key stem
fn validate_category_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "category name cannot be empty".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "category name '{}' must contain only alphanumeric characters, hyphens, and underscores",
            name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output(config: &Config) -> Result<(), ConfigError> {
    if config.output.directory.is_empty() && config.output.s3.is_none() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if let Some(s3) = &config.output.s3 {
        if s3.bucket.is_empty() {
            return Err(ConfigError::Validation(
                "s3 bucket cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
