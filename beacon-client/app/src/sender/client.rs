use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use url::Url;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Request timeout: {0}")]
    RequestTimeout(String),
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the batch ingestion endpoint.
    pub batch_url: String,
    pub health_url: String,
    pub timeout: Duration,
    pub connection_timeout: Duration,
    pub user_agent: String,
    pub enable_compression: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            batch_url: "http://localhost:8080/api/analytics/batch".to_string(),
            health_url: "http://localhost:8080/api/health".to_string(),
            timeout: Duration::from_millis(8000),
            connection_timeout: Duration::from_secs(5),
            user_agent: format!("beacon-client/{}", env!("CARGO_PKG_VERSION")),
            enable_compression: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct ClientStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_response_time: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientStatsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_ms: u64,
}

impl ClientStats {
    pub fn record_request(&self, success: bool, response_time: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time
            .fetch_add(response_time.as_millis() as u64, Ordering::Relaxed);

        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> ClientStatsSnapshot {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let total_response_time = self.total_response_time.load(Ordering::Relaxed);
        ClientStatsSnapshot {
            total_requests,
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            average_response_ms: total_response_time.checked_div(total_requests).unwrap_or(0),
        }
    }
}

/// Pooled HTTP client bound to one collector.
#[derive(Debug)]
pub struct HttpClient {
    pub(crate) client: Client,
    pub config: ClientConfig,
    pub(crate) batch_url: Url,
    health_url: Url,
    pub stats: ClientStats,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let batch_url: Url = config.batch_url.parse().map_err(|e| {
            ClientError::InvalidConfiguration(format!("Invalid batch URL: {e}"))
        })?;
        let health_url: Url = config.health_url.parse().map_err(|e| {
            ClientError::InvalidConfiguration(format!("Invalid health URL: {e}"))
        })?;

        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connection_timeout)
            .user_agent(&config.user_agent);

        if config.enable_compression {
            builder = builder.gzip(true);
        }

        let client = builder.build().map_err(|e| {
            ClientError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            config,
            batch_url,
            health_url,
            stats: ClientStats::default(),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.batch_url.as_str()
    }

    /// Probes the collector's health endpoint.
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let start = std::time::Instant::now();

        let response = timeout(
            self.config.timeout,
            self.client.get(self.health_url.clone()).send(),
        )
        .await
        .map_err(|_| ClientError::RequestTimeout("Health check timeout".to_string()))??;

        let success = response.status().is_success();
        self.stats.record_request(success, start.elapsed());

        if success {
            Ok(())
        } else {
            Err(ClientError::HttpError {
                status: response.status().as_u16(),
                message: format!("Health check failed: {}", response.status()),
            })
        }
    }
}
