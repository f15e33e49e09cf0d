use crate::config::types::{CaptureConfig, Config, CrawlerConfig, UserAgentConfig};
use crate::url::CrawlScope;
use crate::ConfigError;

/// Upper bound on concurrently processed pages
pub const MAX_CONCURRENT_PAGES: usize = 64;

/// Validates the entire configuration
///
/// A missing root URL is allowed here; see [`require_root_url`].
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_capture_config(&config.capture)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the configuration and checks that a root URL is present
pub fn require_root_url(config: &Config) -> Result<&str, ConfigError> {
    validate(config)?;
    config
        .crawler
        .root_url
        .as_deref()
        .ok_or(ConfigError::MissingRootUrl)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if let Some(root) = &config.root_url {
        CrawlScope::new(root, Vec::new())?;
    }

    if config.max_concurrent_pages < 1 || config.max_concurrent_pages > MAX_CONCURRENT_PAGES {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_pages must be between 1 and {}, got {}",
            MAX_CONCURRENT_PAGES, config.max_concurrent_pages
        )));
    }

    if config.navigation_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "navigation_timeout must be >= 1 second, got {}",
            config.navigation_timeout
        )));
    }

    Ok(())
}

/// Validates capture configuration
fn validate_capture_config(config: &CaptureConfig) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "user agent name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.name
        )));
    }

    if config.version.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "user agent version cannot contain whitespace, got '{}'",
            config.version
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_root(root: &str) -> Config {
        let mut config = Config::default();
        config.crawler.root_url = Some(root.to_string());
        config
    }

    #[test]
    fn test_default_config_is_valid_without_root() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_require_root_url() {
        assert!(matches!(
            require_root_url(&Config::default()),
            Err(ConfigError::MissingRootUrl)
        ));

        let config = config_with_root("https://site.example/");
        assert_eq!(require_root_url(&config).unwrap(), "https://site.example/");
    }

    #[test]
    fn test_invalid_root_url() {
        assert!(matches!(
            validate(&config_with_root("site.example")),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate(&config_with_root("ftp://site.example/")),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = config_with_root("https://site.example/");

        config.crawler.max_concurrent_pages = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrent_pages = MAX_CONCURRENT_PAGES + 1;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrent_pages = MAX_CONCURRENT_PAGES;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = config_with_root("https://site.example/");
        config.crawler.navigation_timeout = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_user_agent_name() {
        let mut config = Config::default();
        config.user_agent.name = "my press".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.name = String::new();
        assert!(validate(&config).is_err());

        config.user_agent.name = "my-press_2".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_output_dir_rejected() {
        let mut config = Config::default();
        config.capture.output_dir = std::path::PathBuf::new();
        assert!(validate(&config).is_err());
    }
}
