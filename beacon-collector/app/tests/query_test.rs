mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{FlakyStore, memory_server, server_with};
use serde_json::{Value, json};
use std::sync::Arc;

async fn post(server: &TestServer, event: Value) -> Value {
    let response = server.post("/api/analytics").json(&event).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["event"].clone()
}

async fn seed(server: &TestServer) {
    for event in [
        json!({"kind": "SCREEN_VIEW", "screenName": "Home", "variant": "A"}),
        json!({"kind": "SCREEN_VIEW", "screenName": "Home", "variant": "B"}),
        json!({"kind": "BUTTON_CLICK", "buttonName": "Like", "screenName": "Home"}),
        json!({"kind": "RENDER_TIME", "screenName": "Feed", "renderTimeMs": 100}),
        json!({"kind": "RENDER_TIME", "screenName": "Feed", "renderTimeMs": 50}),
    ] {
        post(server, event).await;
    }
}

fn data(body: &Value) -> &Vec<Value> {
    body["data"].as_array().unwrap()
}

#[tokio::test]
async fn test_list_is_newest_first_with_default_pagination() {
    let (server, _store) = memory_server();
    seed(&server).await;

    let body = server.get("/api/analytics").await.json::<Value>();

    assert_eq!(data(&body).len(), 5);
    assert_eq!(data(&body)[0]["renderTimeMs"], 50.0);
    assert_eq!(data(&body)[4]["variant"], "A");
    assert_eq!(
        body["pagination"],
        json!({"page": 1, "limit": 50, "total": 5, "pages": 1})
    );
}

#[tokio::test]
async fn test_pages_split_results() {
    let (server, _store) = memory_server();
    seed(&server).await;

    let body = server
        .get("/api/analytics")
        .add_query_param("limit", 2)
        .add_query_param("page", 3)
        .await
        .json::<Value>();

    assert_eq!(data(&body).len(), 1);
    assert_eq!(data(&body)[0]["variant"], "A");
    assert_eq!(body["pagination"]["pages"], 3);
    assert_eq!(body["pagination"]["total"], 5);
}

#[tokio::test]
async fn test_filters_combine() {
    let (server, _store) = memory_server();
    seed(&server).await;

    let by_type = server
        .get("/api/analytics")
        .add_query_param("type", "RENDER_TIME")
        .await
        .json::<Value>();
    assert_eq!(by_type["pagination"]["total"], 2);

    let by_screen_and_variant = server
        .get("/api/analytics")
        .add_query_param("screenName", "Home")
        .add_query_param("variant", "B")
        .await
        .json::<Value>();
    assert_eq!(data(&by_screen_and_variant).len(), 1);
    assert_eq!(
        data(&by_screen_and_variant)[0]["message"],
        "Screen View: Home (Variant B)"
    );
}

#[tokio::test]
async fn test_date_range_is_applied() {
    let (server, _store) = memory_server();
    seed(&server).await;

    let everything = server
        .get("/api/analytics")
        .add_query_param("startDate", "2000-01-01")
        .add_query_param("endDate", "2999-12-31T23:59:59Z")
        .await
        .json::<Value>();
    assert_eq!(everything["pagination"]["total"], 5);

    let future = server
        .get("/api/analytics")
        .add_query_param("startDate", "2999-01-01")
        .await
        .json::<Value>();
    assert_eq!(future["pagination"]["total"], 0);
    assert_eq!(future["pagination"]["pages"], 0);
}

#[tokio::test]
async fn test_invalid_query_values_are_rejected() {
    let (server, _store) = memory_server();

    for (key, value) in [("page", "0"), ("limit", "abc"), ("startDate", "soon"), ("type", "BOGUS")] {
        let response = server.get("/api/analytics").add_query_param(key, value).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["details"]["parameter"], key);
    }
}

#[tokio::test]
async fn test_stats_aggregate_by_group() {
    let (server, _store) = memory_server();
    seed(&server).await;

    let stats = server.get("/api/analytics/stats").await.json::<Value>()["stats"].clone();

    assert_eq!(stats["totalEvents"], 5);
    assert_eq!(
        stats["byType"],
        json!([
            {"_id": "RENDER_TIME", "count": 2},
            {"_id": "SCREEN_VIEW", "count": 2},
            {"_id": "BUTTON_CLICK", "count": 1}
        ])
    );
    assert_eq!(
        stats["byScreen"],
        json!([{"_id": "Home", "count": 3}, {"_id": "Feed", "count": 2}])
    );
    assert_eq!(
        stats["byVariant"],
        json!([{"_id": "A", "count": 1}, {"_id": "B", "count": 1}])
    );
    assert_eq!(stats["avgRenderTime"], 75.0);
}

#[tokio::test]
async fn test_stats_without_render_samples_average_zero() {
    let (server, _store) = memory_server();
    post(&server, json!({"kind": "SCREEN_VIEW", "screenName": "Home"})).await;

    let stats = server
        .get("/api/analytics/stats")
        .add_query_param("startDate", "2000-01-01")
        .await
        .json::<Value>()["stats"]
        .clone();
    assert_eq!(stats["totalEvents"], 1);
    assert_eq!(stats["avgRenderTime"], 0.0);
    assert_eq!(stats["byVariant"], json!([]));
}

#[tokio::test]
async fn test_get_event_by_id() {
    let (server, _store) = memory_server();
    let created = post(&server, json!({"kind": "BUTTON_CLICK", "buttonName": "Like"})).await;
    let id = created["id"].as_str().unwrap();

    let found = server.get(&format!("/api/analytics/{id}")).await;
    found.assert_status_ok();
    assert_eq!(found.json::<Value>()["data"], created);

    let missing = server.get("/api/analytics/does-not-exist").await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(missing.json::<Value>(), json!({"error": "Event not found"}));
}

#[tokio::test]
async fn test_health_reports_storage_state() {
    let (server, _store) = memory_server();
    let body = server.get("/api/health").await.json::<Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert!(body["timestamp"].is_string());

    let down = server_with(Arc::new(FlakyStore::down()));
    let response = down.get("/api/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["database"], "disconnected");
}

#[tokio::test]
async fn test_root_describes_service() {
    let (server, _store) = memory_server();
    let body = server.get("/").await.json::<Value>();
    assert_eq!(body["name"], "beacon-collector");
    assert_eq!(body["endpoints"]["health"], "/api/health");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (server, _store) = memory_server();
    let response = server.get("/api/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Not found", "path": "/api/nope"})
    );
}
