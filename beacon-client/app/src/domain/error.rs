use thiserror::Error;

/// Top-level error type for the forwarding binary.
#[derive(Error, Debug)]
pub enum ClientAppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::app::ConfigError),

    #[error("Logging initialization failed: {0}")]
    Logging(#[from] crate::app::LoggingError),

    #[error("HTTP client error: {0}")]
    Client(#[from] crate::sender::ClientError),

    #[error("Input error: {0}")]
    Input(#[from] std::io::Error),
}

/// Why a line of input could not become an event.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid event: {0}")]
    Invalid(#[from] beacon_event::ValidationError),
}
