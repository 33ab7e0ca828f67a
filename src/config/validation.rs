use crate::config::types::{Config, CrawlConfig, OutputConfig, ServerConfig};
use crate::ConfigError;

/// Upper bound accepted for `max-concurrency`
const MAX_CONCURRENCY_LIMIT: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates crawl parameters
pub fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request_timeout must be greater than zero".to_string(),
        ));
    }

    if let Some(limit) = config.max_concurrency {
        if !(1..=MAX_CONCURRENCY_LIMIT).contains(&limit) {
            return Err(ConfigError::Validation(format!(
                "max_concurrency must be between 1 and {}, got {}",
                MAX_CONCURRENCY_LIMIT, limit
            )));
        }
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.port == 0 {
        return Err(ConfigError::Validation(
            "server port must be non-zero".to_string(),
        ));
    }

    Ok(())
}
