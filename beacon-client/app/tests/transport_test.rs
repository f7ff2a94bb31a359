use beacon_client::app::Config;
use beacon_client::buffer::{Batch, BufferedEvent};
use beacon_client::domain::{TelemetryEvent, Variant};
use beacon_client::sender::{
    BatchTransmitter, DeliveryOutcome, HttpClient, RejectReason, RetryReason, Transport,
};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transmitter(base_url: &str, timeout_ms: u64) -> BatchTransmitter {
    let mut config = Config {
        base_url: base_url.to_string(),
        timeout_ms,
        ..Config::default()
    };
    config.post_process().unwrap();
    BatchTransmitter::new(HttpClient::new(config.client_config()).unwrap())
}

fn batch() -> Batch {
    let mut event = TelemetryEvent::screen_view("Home", Some(Variant::A));
    event.ensure_message();
    Batch::new(vec![
        BufferedEvent::new(event),
        BufferedEvent::new(TelemetryEvent::button_click("Like", Some("Home".to_string()))),
    ])
}

#[tokio::test]
async fn created_response_is_delivered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analytics/batch"))
        .and(header_exists("x-batch-id"))
        .and(body_partial_json(serde_json::json!({
            "events": [{"kind": "SCREEN_VIEW", "screenName": "Home", "variant": "A",
                        "message": "Screen View: Home (Variant A)"}]
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"success": true, "count": 2})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transmitter = transmitter(&server.uri(), 2000);
    let outcome = transmitter.send(&batch()).await;

    assert_eq!(outcome, DeliveryOutcome::Delivered);
    let stats = transmitter.client().stats.snapshot();
    assert_eq!(stats.successful_requests, 1);
}

#[tokio::test]
async fn validation_rejection_is_not_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analytics/batch"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid event type"))
        .mount(&server)
        .await;

    let outcome = transmitter(&server.uri(), 2000).send(&batch()).await;

    assert_eq!(
        outcome,
        DeliveryOutcome::Rejected(RejectReason::Status {
            status: 400,
            body: "Invalid event type".to_string(),
        })
    );
}

#[tokio::test]
async fn server_error_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = transmitter(&server.uri(), 2000).send(&batch()).await;

    assert_eq!(outcome, DeliveryOutcome::Retryable(RetryReason::ServerError(500)));
}

#[tokio::test]
async fn slow_server_times_out_as_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_millis(800)))
        .mount(&server)
        .await;

    let outcome = transmitter(&server.uri(), 100).send(&batch()).await;

    assert_eq!(outcome, DeliveryOutcome::Retryable(RetryReason::Timeout));
}

#[tokio::test]
async fn unreachable_server_is_retryable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let outcome = transmitter(&format!("http://127.0.0.1:{port}"), 2000)
        .send(&batch())
        .await;

    assert!(matches!(
        outcome,
        DeliveryOutcome::Retryable(RetryReason::Unreachable(_))
    ));
}

#[tokio::test]
async fn health_check_hits_health_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok", "database": "connected"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transmitter = transmitter(&server.uri(), 2000);
    assert!(transmitter.client().health_check().await.is_ok());
}
