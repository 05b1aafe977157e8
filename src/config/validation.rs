use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, RetryConfig, SessionConfig, TargetConfig,
};
use crate::crawler::PartitionKey;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target_config(&config.target)?;
    validate_retry_config(&config.retry)?;
    validate_crawler_config(&config.crawler)?;
    validate_session_config(&config.session)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Parses a letter selection into partition keys
///
/// Letters are case-insensitive; anything outside A-Z and repeated letters
/// are rejected.
///
/// # Arguments
///
/// * `letters` - Letters as written in the config or on the command line
///
/// # Returns
///
/// * `Ok(Vec<PartitionKey>)` - Upper-cased keys in the order given
/// * `Err(ConfigError)` - Empty input, a non-letter or a repeated letter
pub fn parse_letters(letters: &str) -> Result<Vec<PartitionKey>, ConfigError> {
    let mut keys: Vec<PartitionKey> = Vec::new();

    for c in letters.chars().filter(|c| !c.is_whitespace()) {
        let key = PartitionKey::new(c).ok_or_else(|| {
            ConfigError::Validation(format!("letters may only contain A-Z, got '{}'", c))
        })?;

        if keys.contains(&key) {
            return Err(ConfigError::Validation(format!(
                "letter '{}' is listed more than once",
                key
            )));
        }
        keys.push(key);
    }

    if keys.is_empty() {
        return Err(ConfigError::Validation(
            "letters cannot be empty".to_string(),
        ));
    }

    Ok(keys)
}

fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "endpoint must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.action_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "action_key cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 20 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 20, got {}",
            config.max_attempts
        )));
    }

    if config.max_delay_ms < config.base_delay_ms {
        return Err(ConfigError::Validation(format!(
            "max_delay_ms ({}) must be >= base_delay_ms ({})",
            config.max_delay_ms, config.base_delay_ms
        )));
    }

    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if let Some(letters) = &config.letters {
        parse_letters(letters)?;
    }

    if config.placeholder_title.trim().is_empty() {
        return Err(ConfigError::Validation(
            "placeholder_title cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    match (&config.cookie_file, config.cookies.is_empty()) {
        (Some(_), false) => Err(ConfigError::Validation(
            "set either session.cookies or session.cookie-file, not both".to_string(),
        )),
        (None, true) => Err(ConfigError::Validation(
            "session needs cookies or a cookie-file".to_string(),
        )),
        (Some(path), true) if path.trim().is_empty() => Err(ConfigError::Validation(
            "cookie_file cannot be empty".to_string(),
        )),
        _ => Ok(()),
    }
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "directory cannot be empty".to_string(),
        ));
    }

    if matches!(&config.database_path, Some(p) if p.is_empty()) {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
