use crate::config::types::{Config, CrawlerConfig, RenderFallbackConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_render_fallback_config(&config.render_fallback)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.default_max_depth < 1 || config.default_max_depth > 10 {
        return Err(ConfigError::Validation(format!(
            "default-max-depth must be between 1 and 10, got {}",
            config.default_max_depth
        )));
    }

    if config.default_max_pages < 1 || config.default_max_pages > 1000 {
        return Err(ConfigError::Validation(format!(
            "default-max-pages must be between 1 and 1000, got {}",
            config.default_max_pages
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates render fallback configuration
fn validate_render_fallback_config(config: &RenderFallbackConfig) -> Result<(), ConfigError> {
    // A threshold above 1 MiB would re-render virtually every page
    if config.min_html_bytes > 1_048_576 {
        return Err(ConfigError::Validation(format!(
            "min-html-bytes must be <= 1048576, got {}",
            config.min_html_bytes
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if !config.contact_url.is_empty() {
        Url::parse(&config.contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    if !config.contact_email.is_empty() {
        validate_email(&config.contact_email)?;
    }

    Ok(())
}

/// Basic email shape check: one @, non-empty local part, dot in domain
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = email.split('@').collect();

    let valid = parts.len() == 2
        && !parts[0].is_empty()
        && parts[1].contains('.')
        && !parts[1].starts_with('.')
        && !parts[1].ends_with('.');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "Invalid contact-email: '{}'",
            email
        )))
    }
}
