mod common;

use beacon_client::app::{App, Config};
use beacon_client::dispatch::{DispatchConfig, FlushOutcome};
use beacon_client::domain::{EventKind, Variant};
use beacon_client::telemetry::{RenderTimer, Telemetry};
use common::RecordingTransport;
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;

fn telemetry() -> (Telemetry<RecordingTransport>, RecordingTransport) {
    let transport = RecordingTransport::default();
    (
        Telemetry::new(transport.clone(), DispatchConfig::default()),
        transport,
    )
}

#[tokio::test]
async fn screen_view_message_is_derived() {
    let (telemetry, _) = telemetry();
    telemetry.log_screen_view("Home", Some(Variant::A));

    let events = telemetry.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].message.as_deref(),
        Some("Screen View: Home (Variant A)")
    );
}

#[tokio::test]
async fn events_by_kind_filters_pending_events() {
    let (telemetry, _) = telemetry();
    telemetry.log_screen_view("Home", None);
    telemetry.log_button_click("Like", Some("Home".to_string()));
    telemetry.log_render_time("Feed", 42.0);
    telemetry.log_button_click("Share", None);

    let clicks = telemetry.events_by_kind(EventKind::ButtonClick);
    assert_eq!(clicks.len(), 2);
    assert_eq!(clicks[0].message.as_deref(), Some("Button Click: Like on Home"));
    assert_eq!(telemetry.pending_count(), 4);

    assert_eq!(telemetry.clear(), 4);
    assert!(telemetry.events().is_empty());
}

#[tokio::test]
async fn assigned_variant_tags_screen_views() {
    let (telemetry, _) = telemetry();
    telemetry.variant().set_variant(Variant::B);
    telemetry.log_screen_view_with_assigned_variant("Profile");

    assert_eq!(telemetry.events()[0].variant, Some(Variant::B));
}

#[tokio::test]
async fn flush_hands_events_to_transport() {
    let (telemetry, transport) = telemetry();
    telemetry.log_render_time("Feed", 12.5);

    assert!(matches!(telemetry.flush().await, FlushOutcome::Completed(_)));
    assert_eq!(
        transport.calls(),
        vec![vec!["Render Time: Feed - 12.5ms".to_string()]]
    );
    assert_eq!(telemetry.pending_count(), 0);
}

#[tokio::test]
async fn render_timer_records_elapsed_time() {
    let (telemetry, _) = telemetry();
    let timer = RenderTimer::start("Feed");
    let elapsed = timer.finish(&telemetry);

    let events = telemetry.events_by_kind(EventKind::RenderTime);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].render_time_ms, Some(elapsed));
    assert!(elapsed >= 0.0);
}

fn offline_app() -> App {
    let config = Config {
        enable_sync: false,
        ..Config::default()
    };
    App::from_config(config).unwrap()
}

#[traced_test]
#[tokio::test]
async fn ingest_skips_bad_lines() {
    let app = offline_app();
    let input = concat!(
        "{\"kind\":\"SCREEN_VIEW\",\"screenName\":\"Home\",\"variant\":\"A\"}\n",
        "\n",
        "not json\n",
        "{\"kind\":\"BOGUS\"}\n",
        "{\"type\":\"RENDER_TIME\",\"screenName\":\"Feed\",\"renderTime\":30}\n",
    );

    let summary = app
        .ingest(input.as_bytes(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.skipped, 2);
    assert!(logs_contain("Skipping input line"));

    let events = app.telemetry().events();
    assert_eq!(events[0].message.as_deref(), Some("Screen View: Home (Variant A)"));
    assert_eq!(events[1].message.as_deref(), Some("Render Time: Feed - 30ms"));
}

#[tokio::test]
async fn ingest_stops_when_cancelled() {
    let app = offline_app();
    let token = CancellationToken::new();
    token.cancel();

    let summary = app
        .ingest("{\"kind\":\"SCREEN_VIEW\",\"screenName\":\"Home\"}\n".as_bytes(), &token)
        .await
        .unwrap();

    assert_eq!(summary.accepted, 0);
}
