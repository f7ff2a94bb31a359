pub mod config;
pub mod logging;
pub mod shutdown;

pub use config::{Config, ConfigError, LogLevel};
pub use logging::{LoggingError, setup_logging};
pub use shutdown::shutdown_signal;

use crate::dispatch::FlushOutcome;
use crate::domain::{ClientAppError, IngestError, validate};
use crate::sender::{BatchTransmitter, HttpClient};
use crate::telemetry::Telemetry;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Counts of input lines handled by [`App::ingest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub accepted: usize,
    pub skipped: usize,
}

/// Forwarding binary: reads NDJSON events and pushes them through the
/// telemetry pipeline.
pub struct App {
    config: Config,
    telemetry: Telemetry<BatchTransmitter>,
}

impl App {
    pub fn from_args<I, T>(args: I) -> Result<Self, ClientAppError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::from_config(Config::from_args(args)?)
    }

    pub fn from_config(config: Config) -> Result<Self, ClientAppError> {
        let client = HttpClient::new(config.client_config())?;
        let telemetry = Telemetry::new(BatchTransmitter::new(client), config.dispatch_config());
        Ok(Self { config, telemetry })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn telemetry(&self) -> &Telemetry<BatchTransmitter> {
        &self.telemetry
    }

    /// Validates one NDJSON line and records it. Blank lines are ignored and
    /// return `Ok(false)`.
    pub fn ingest_line(&self, line: &str) -> Result<bool, IngestError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(false);
        }
        let raw: serde_json::Value = serde_json::from_str(line)?;
        let event = validate(&raw)?;
        self.telemetry.track(event);
        Ok(true)
    }

    /// Reads lines until EOF or cancellation. Bad lines are logged and skipped.
    pub async fn ingest<R>(&self, reader: R, token: &CancellationToken) -> std::io::Result<IngestSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut summary = IngestSummary::default();
        let mut line_no = 0usize;

        loop {
            let line = tokio::select! {
                biased;
                () = token.cancelled() => break,
                line = lines.next_line() => line?,
            };
            let Some(line) = line else { break };
            line_no += 1;

            match self.ingest_line(&line) {
                Ok(true) => summary.accepted += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(line = line_no, error = %e, "Skipping input line");
                    summary.skipped += 1;
                }
            }
        }
        Ok(summary)
    }

    pub async fn run(self) -> Result<IngestSummary, ClientAppError> {
        info!(
            version = crate::VERSION,
            endpoint = %self.config.batch_url(),
            batch_size = self.config.batch_size,
            interval_ms = self.config.batch_interval_ms,
            sync = self.config.enable_sync,
            "Starting beacon-client"
        );

        if self.config.enable_sync {
            let client = self.telemetry.dispatcher().transport().client();
            match client.health_check().await {
                Ok(()) => info!("Collector is reachable"),
                Err(e) => warn!(error = %e, "Collector health check failed, events will be retried"),
            }
        }

        let handle = self.telemetry.start();
        let token = CancellationToken::new();
        let signal_token = token.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            signal_token.cancel();
        });

        let summary = self
            .ingest(BufReader::new(tokio::io::stdin()), &token)
            .await?;
        handle.shutdown().await;

        if let FlushOutcome::Completed(flush) = self.telemetry.flush().await {
            info!(delivered = flush.delivered, dropped = flush.dropped, "Final flush done");
        }
        let pending = self.telemetry.pending_count();
        if pending > 0 {
            warn!(pending, "Exiting with undelivered events");
        }

        info!(accepted = summary.accepted, skipped = summary.skipped, "beacon-client stopped");
        Ok(summary)
    }
}
