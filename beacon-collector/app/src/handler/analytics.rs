use super::ApiError;
use super::query::{ListParams, RangeParams};
use crate::app::state::AppState;
use crate::domain::{Pagination, StoredEvent, kind_of, validate};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::{info, warn};

type Created = (StatusCode, Json<Value>);

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        ApiError::bad_request(
            "Invalid JSON body",
            json!({ "message": rejection.body_text() }),
        )
    })
}

/// POST /analytics
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Created, ApiError> {
    let raw = json_body(payload)?;
    let stored = StoredEvent::new(validate(&raw)?);

    state.store.insert_one(stored.clone()).await?;
    info!(id = %stored.id, kind = %stored.event.kind, "Stored event");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "event": stored })),
    ))
}

/// POST /analytics/batch
///
/// Kinds are checked for every entry before anything is stored; a bad kind
/// rejects the whole batch. After that each entry stands alone: invalid
/// entries and failed inserts only lower the reported `count`.
pub async fn create_batch(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Created, ApiError> {
    let body = json_body(payload)?;
    let entries = match body.get("events") {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => {
            return Err(ApiError::bad_request(
                "events array is required",
                json!({ "message": "body must contain a non-empty `events` array" }),
            ));
        }
    };

    for (index, raw) in entries.iter().enumerate() {
        if let Err(e) = kind_of(raw) {
            warn!(index, rule = e.rule(), error = %e, "Rejecting batch with invalid kind");
            return Err(ApiError::bad_request(
                "Invalid event type",
                json!({ "index": index, "rule": e.rule(), "message": e.to_string() }),
            ));
        }
    }

    // Submitted index of each entry in `valid`, for log lines.
    let mut submitted_at = Vec::with_capacity(entries.len());
    let mut valid = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;
    for (index, raw) in entries.iter().enumerate() {
        match validate(raw) {
            Ok(event) => {
                submitted_at.push(index);
                valid.push(StoredEvent::new(event));
            }
            Err(e) => {
                skipped += 1;
                warn!(index, rule = e.rule(), error = %e, "Dropping invalid batch entry");
            }
        }
    }

    let attempted = valid.len();
    let report = state.store.insert_many(valid).await;
    for failure in &report.failures {
        let index = submitted_at.get(failure.index).copied().unwrap_or(failure.index);
        warn!(index, error = %failure.error, "Batch entry failed to persist");
    }

    // Nothing stored out of a non-empty insert means storage itself is down;
    // answer 5xx so the sender keeps the batch.
    if attempted > 0 && report.inserted == 0
        && let Some(failure) = report.failures.into_iter().next()
    {
        return Err(ApiError::Storage(failure.error));
    }

    info!(
        submitted = entries.len(),
        inserted = report.inserted,
        skipped,
        "Batch ingested"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "count": report.inserted })),
    ))
}

/// GET /analytics
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let (filter, page) = params.into_query()?;
    let total = state.store.count(filter.clone()).await?;
    let data = state.store.find(filter, page).await?;

    Ok(Json(json!({
        "data": data,
        "pagination": Pagination::new(page, total),
    })))
}

/// GET /analytics/stats
pub async fn event_stats(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Value>, ApiError> {
    let stats = state.store.stats(params.into_range()?).await?;
    Ok(Json(json!({ "stats": stats })))
}

/// GET /analytics/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .find_by_id(id)
        .await?
        .map(|stored| Json(json!({ "data": stored })))
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))
}
