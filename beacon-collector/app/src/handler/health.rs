use crate::app::state::AppState;
use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// Handler for GET /health. Always 200; storage reachability is reported in
/// the body so the service stays up while the backend is down.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!(error = %e, "Storage ping failed");
            "disconnected"
        }
    };
    debug!(database, "Health check requested");

    Json(json!({
        "status": "ok",
        "database": database,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
