use crate::error::CollectorError;
use axum::Router;
use tokio::signal;
use tracing::info;

/// Bind `address` and serve until SIGINT/SIGTERM, letting in-flight
/// requests finish.
pub async fn serve(app: Router, address: &str) -> Result<(), CollectorError> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| CollectorError::Bind {
            address: address.to_string(),
            source: e,
        })?;
    info!("Collector listening on {}", listener.local_addr()?);
    info!("  - POST /api/analytics        (single event)");
    info!("  - POST /api/analytics/batch  (event batch)");
    info!("  - GET  /api/analytics        (list)");
    info!("  - GET  /api/analytics/stats  (aggregates)");
    info!("  - GET  /api/health           (health check)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
