use super::{Config, ConfigError};
use url::Url;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Base URL '{}' must use http or https",
                self.base_url
            )));
        }

        if !self.analytics_path.starts_with('/') {
            return Err(ConfigError::InvalidConfig(format!(
                "Analytics path '{}' must start with '/'",
                self.analytics_path
            )));
        }

        if self.batch_size == 0 {
            return Err(ConfigError::InvalidConfig(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if self.batch_interval_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "Batch interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
