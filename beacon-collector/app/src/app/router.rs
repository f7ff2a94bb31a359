use super::state::AppState;
use crate::handler::analytics::{create_batch, create_event, event_stats, get_event, list_events};
use crate::handler::health::health_handler;
use crate::handler::root::{not_found, service_info};
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/analytics", post(create_event).get(list_events))
        .route("/analytics/batch", post(create_batch))
        .route("/analytics/stats", get(event_stats))
        .route("/analytics/{id}", get(get_event))
        .route("/health", get(health_handler))
}

/// Full HTTP surface: service descriptor at `/`, everything else under `/api`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .nest("/api", api_router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
