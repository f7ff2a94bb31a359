pub mod router;
pub mod server;
pub mod state;
pub mod tracing;

use crate::config;
use crate::error::CollectorError;

pub use router::router;
pub use state::AppState;

/// Collector entry point: tracing, configuration, storage, then the HTTP server.
pub async fn run() -> Result<(), CollectorError> {
    tracing::init_tracing()?;

    let settings = config::get_configuration()?;
    ::tracing::info!(
        address = %settings.bind_address(),
        storage = settings.storage_kind(),
        "Loaded settings"
    );

    let state = AppState::from_settings(&settings).await;
    server::serve(router(state), &settings.bind_address()).await
}
