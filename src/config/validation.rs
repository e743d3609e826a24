use crate::config::types::{Config, CrawlerConfig, OutputConfig, SelectorConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;

/// Upper bound on concurrent date crawls
const MAX_DATE_WORKERS: u32 = 64;

/// Validates the entire configuration
///
/// The `[window]` section is not checked here: it may be overridden per run,
/// and [`CrawlWindow::resolve`](crate::CrawlWindow::resolve) rejects the
/// window that is actually used.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    crate::url::parse_archive_base(&config.archive_url)?;

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    // Keeps the last backoff wait at or below base * 2^15
    if config.max_retries > 16 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 16, got {}",
            config.max_retries
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1 second".to_string(),
        ));
    }

    if config.date_workers < 1 || config.date_workers > MAX_DATE_WORKERS {
        return Err(ConfigError::Validation(format!(
            "date_workers must be between 1 and {}, got {}",
            MAX_DATE_WORKERS, config.date_workers
        )));
    }

    if config.crawl_timeout == Some(0) {
        return Err(ConfigError::Validation(
            "crawl_timeout must be > 0 seconds when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.browser.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent browser string cannot be empty".to_string(),
        ));
    }

    if config.browser.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user-agent browser string cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates that each configured selector compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for selector in [&config.headline, &config.category, &config.pagination] {
        compile_selector(selector)?;
    }
    Ok(())
}

/// Compiles a CSS selector, mapping failures to a config error
pub(crate) fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.file_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "file_prefix cannot be empty".to_string(),
        ));
    }

    if config
        .file_prefix
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        return Err(ConfigError::Validation(format!(
            "file_prefix must be a plain file name, got '{}'",
            config.file_prefix
        )));
    }

    Ok(())
}
