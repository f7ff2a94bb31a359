use std::env;
use std::fs;

use crate::error::CollectorError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickHouseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ClickHouseSettings {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Memory,
    ClickHouse(ClickHouseSettings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub http_host: String,
    pub http_port: u16,
    pub storage: StorageBackend,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http_host: DEFAULT_HOST.to_string(),
            http_port: DEFAULT_PORT,
            storage: StorageBackend::Memory,
        }
    }
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), CollectorError> {
        validate_host(&self.http_host)?;
        validate_port(self.http_port)?;
        if let StorageBackend::ClickHouse(ch) = &self.storage {
            validate_host(&ch.host)?;
            validate_port(ch.port)?;
        }
        Ok(())
    }

    pub fn storage_kind(&self) -> &'static str {
        match self.storage {
            StorageBackend::Memory => "memory",
            StorageBackend::ClickHouse(_) => "clickhouse",
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// Validates that the host is not empty or whitespace-only.
fn validate_host(host: &str) -> Result<(), CollectorError> {
    if host.trim().is_empty() {
        return Err(CollectorError::Config("Host cannot be empty".into()));
    }
    Ok(())
}

fn validate_port(port: u16) -> Result<(), CollectorError> {
    if port == 0 {
        return Err(CollectorError::Config("Port cannot be 0".into()));
    }
    Ok(())
}

fn required(env_name: &str) -> Result<String, CollectorError> {
    env::var(env_name).map_err(|_| {
        CollectorError::Config(format!("Missing required environment variable: {env_name}"))
    })
}

fn parse_port(env_name: &str, raw: &str) -> Result<u16, CollectorError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|e| CollectorError::Config(format!("Invalid {env_name} '{raw}': {e}")))
}

/// Read a value from environment variable, with support for _FILE suffix (Docker Secrets)
fn get_env_or_file(env_name: &str) -> Result<String, CollectorError> {
    let file_env = format!("{env_name}_FILE");
    if let Ok(file_path) = env::var(&file_env) {
        return fs::read_to_string(&file_path)
            .map(|content| content.trim().to_string())
            .map_err(|e| CollectorError::Config(format!("Failed to read {file_env}: {e}")));
    }

    env::var(env_name).map_err(|_| {
        CollectorError::Config(format!(
            "Missing required environment variable: {env_name} or {file_env}"
        ))
    })
}

fn clickhouse_from_env() -> Result<ClickHouseSettings, CollectorError> {
    let port_raw = required("APP_CLICKHOUSE_PORT")?;
    Ok(ClickHouseSettings {
        host: required("APP_CLICKHOUSE_HOST")?,
        port: parse_port("APP_CLICKHOUSE_PORT", &port_raw)?,
        user: required("APP_CLICKHOUSE_USER")?,
        password: get_env_or_file("APP_CLICKHOUSE_PASSWORD")?,
        database: required("APP_CLICKHOUSE_DATABASE")?,
    })
}

pub fn get_configuration() -> Result<Settings, CollectorError> {
    let http_host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let http_port = match env::var("PORT") {
        Ok(raw) => parse_port("PORT", &raw)?,
        Err(_) => DEFAULT_PORT,
    };

    let backend = env::var("APP_STORAGE_BACKEND").unwrap_or_else(|_| "memory".to_string());
    let storage = match backend.trim().to_ascii_lowercase().as_str() {
        "memory" => StorageBackend::Memory,
        "clickhouse" => StorageBackend::ClickHouse(clickhouse_from_env()?),
        other => {
            return Err(CollectorError::Config(format!(
                "Unknown storage backend '{other}' (expected memory or clickhouse)"
            )));
        }
    };

    let settings = Settings {
        http_host,
        http_port,
        storage,
    };
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clickhouse(host: &str, port: u16) -> StorageBackend {
        StorageBackend::ClickHouse(ClickHouseSettings {
            host: host.into(),
            port,
            user: "default".into(),
            password: String::new(),
            database: "default".into(),
        })
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let err = validate_port(0).unwrap_err();
        assert!(err.to_string().contains("Port cannot be 0"));
        assert!(validate_port(8080).is_ok());
    }

    #[test]
    fn test_validate_host_whitespace_fails() {
        let err = validate_host("   ").unwrap_err();
        assert!(err.to_string().contains("Host cannot be empty"));
        assert!(validate_host("localhost").is_ok());
    }

    #[test]
    fn test_default_settings_use_memory_storage() {
        let settings = Settings::default();
        assert_eq!(settings.storage, StorageBackend::Memory);
        assert_eq!(settings.bind_address(), "0.0.0.0:8080");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validate_clickhouse_empty_host_fails() {
        let settings = Settings {
            storage: clickhouse("", 8123),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_validate_clickhouse_zero_port_fails() {
        let settings = Settings {
            storage: clickhouse("localhost", 0),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_clickhouse_url() {
        let StorageBackend::ClickHouse(ch) = clickhouse("ch", 8123) else {
            unreachable!()
        };
        assert_eq!(ch.url(), "http://ch:8123");
    }

    #[test]
    fn test_password_is_read_from_secret_file() {
        let mut secret = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut secret, b"s3cret\n").unwrap();
        // Name is unique to this test, so no other test observes it.
        unsafe {
            env::set_var("BEACON_TEST_SECRET_FILE", secret.path());
        }
        assert_eq!(get_env_or_file("BEACON_TEST_SECRET").unwrap(), "s3cret");
        unsafe {
            env::remove_var("BEACON_TEST_SECRET_FILE");
        }
    }

    #[test]
    fn test_missing_secret_names_both_variables() {
        let err = get_env_or_file("BEACON_TEST_ABSENT").unwrap_err();
        assert!(err.to_string().contains("BEACON_TEST_ABSENT_FILE"));
    }

    #[test]
    fn test_parse_port_rejects_garbage() {
        assert!(parse_port("PORT", "eighty").is_err());
        assert_eq!(parse_port("PORT", " 9000 ").unwrap(), 9000);
    }
}
