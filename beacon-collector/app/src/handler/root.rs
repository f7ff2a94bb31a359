use axum::Json;
use axum::http::{StatusCode, Uri};
use serde_json::{Value, json};

/// GET /
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "analytics": "/api/analytics",
            "batch": "/api/analytics/batch",
            "stats": "/api/analytics/stats",
            "event": "/api/analytics/{id}",
            "health": "/api/health",
        },
    }))
}

pub async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "path": uri.path() })),
    )
}
