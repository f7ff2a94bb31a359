use super::serde_helpers::{load_env_path_opt, load_env_string, load_env_var};
use super::{ConfigError, LogLevel};
use crate::dispatch::DispatchConfig;
use crate::sender::ClientConfig;
use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_ANALYTICS_PATH: &str = "/api/analytics";
const HEALTH_PATH: &str = "/api/health";

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about = "Forwards telemetry events to a beacon collector", long_about = None)]
#[serde(default)]
pub struct Config {
    /// Collector base URL
    #[arg(long, env = "BEACON_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Path of the analytics endpoint on the collector
    #[arg(long, env = "BEACON_ANALYTICS_PATH", default_value = DEFAULT_ANALYTICS_PATH)]
    pub analytics_path: String,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "BEACON_TIMEOUT_MS", default_value = "8000")]
    pub timeout_ms: u64,

    /// Maximum events per batch request
    #[arg(long, env = "BEACON_BATCH_SIZE", default_value = "10")]
    pub batch_size: usize,

    /// Periodic flush interval in milliseconds
    #[arg(long, env = "BEACON_BATCH_INTERVAL_MS", default_value = "2000")]
    pub batch_interval_ms: u64,

    /// Send events to the collector; when false they are only kept locally
    #[arg(long, env = "BEACON_ENABLE_SYNC", default_value_t = true, action = ArgAction::Set)]
    pub enable_sync: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Configuration file path (optional)
    #[arg(long, env = "BEACON_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    #[serde(skip)]
    #[arg(skip)]
    pub timeout: Duration,

    #[serde(skip)]
    #[arg(skip)]
    pub batch_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            analytics_path: DEFAULT_ANALYTICS_PATH.to_string(),
            timeout_ms: 8000,
            batch_size: 10,
            batch_interval_ms: 2000,
            enable_sync: true,
            log_level: LogLevel::Info,
            config_file: None,
            timeout: Duration::from_millis(8000),
            batch_interval: Duration::from_millis(2000),
        }
    }
}

impl Config {
    /// Parses command-line arguments (with env fallbacks). Values left at
    /// their defaults are taken from `--config-file` when one is given.
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);
        if let Some(path) = config.config_file.clone() {
            let base = Self::read_file(&path)?;
            config.fill_defaults_from(base);
        }
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        load_env_path_opt("BEACON_CONFIG_FILE", &mut config.config_file);
        if let Some(path) = config.config_file.clone() {
            config = Self::read_file(&path)?;
            config.config_file = Some(path);
        }

        load_env_string("BEACON_BASE_URL", &mut config.base_url);
        load_env_string("BEACON_ANALYTICS_PATH", &mut config.analytics_path);
        load_env_var("BEACON_TIMEOUT_MS", &mut config.timeout_ms)?;
        load_env_var("BEACON_BATCH_SIZE", &mut config.batch_size)?;
        load_env_var("BEACON_BATCH_INTERVAL_MS", &mut config.batch_interval_ms)?;
        load_env_var("BEACON_ENABLE_SYNC", &mut config.enable_sync)?;
        load_env_var("LOG_LEVEL", &mut config.log_level)?;

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path.as_ref())?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn fill_defaults_from(&mut self, base: Config) {
        let defaults = Config::default();
        if self.base_url == defaults.base_url {
            self.base_url = base.base_url;
        }
        if self.analytics_path == defaults.analytics_path {
            self.analytics_path = base.analytics_path;
        }
        if self.timeout_ms == defaults.timeout_ms {
            self.timeout_ms = base.timeout_ms;
        }
        if self.batch_size == defaults.batch_size {
            self.batch_size = base.batch_size;
        }
        if self.batch_interval_ms == defaults.batch_interval_ms {
            self.batch_interval_ms = base.batch_interval_ms;
        }
        if self.enable_sync == defaults.enable_sync {
            self.enable_sync = base.enable_sync;
        }
        if self.log_level == defaults.log_level {
            self.log_level = base.log_level;
        }
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        self.timeout = Duration::from_millis(self.timeout_ms);
        self.batch_interval = Duration::from_millis(self.batch_interval_ms);
        Ok(())
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn analytics_url(&self) -> String {
        format!("{}{}", self.base(), self.analytics_path.trim_end_matches('/'))
    }

    pub fn batch_url(&self) -> String {
        format!("{}/batch", self.analytics_url())
    }

    pub fn health_url(&self) -> String {
        format!("{}{HEALTH_PATH}", self.base())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            batch_url: self.batch_url(),
            health_url: self.health_url(),
            timeout: self.timeout,
            ..ClientConfig::default()
        }
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            batch_size: self.batch_size,
            interval: self.batch_interval,
            enabled: self.enable_sync,
        }
    }
}
