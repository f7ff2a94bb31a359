use super::config::LogLevel;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const QUIET_TARGETS: [&str; 4] = ["hyper", "hyper_util", "reqwest", "h2"];

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid filter '{filter}': {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("global subscriber already set: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Filter string for the given level with HTTP internals quietened.
pub fn build_filter_string(level: LogLevel) -> String {
    std::iter::once(level.as_str().to_string())
        .chain(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global subscriber. Logs go to stderr because stdin/stdout
/// carry the event stream.
pub fn setup_logging(level: LogLevel) -> Result<(), LoggingError> {
    let filter = build_filter_string(level);
    let env_filter = EnvFilter::try_new(&filter).map_err(|source| LoggingError::Filter {
        filter: filter.clone(),
        source,
    })?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()?;
    Ok(())
}
