mod common;

use beacon_client::buffer::EventBuffer;
use beacon_client::dispatch::{BatchDispatcher, DispatchConfig};
use beacon_client::domain::TelemetryEvent;
use common::RecordingTransport;
use std::sync::Arc;
use std::time::Duration;

fn dispatcher(transport: RecordingTransport) -> Arc<BatchDispatcher<RecordingTransport>> {
    dispatcher_every(transport, Duration::from_millis(2000))
}

fn dispatcher_every(
    transport: RecordingTransport,
    interval: Duration,
) -> Arc<BatchDispatcher<RecordingTransport>> {
    Arc::new(BatchDispatcher::new(
        Arc::new(EventBuffer::new()),
        transport,
        DispatchConfig {
            batch_size: 10,
            interval,
            enabled: true,
        },
    ))
}

fn screen(name: &str) -> TelemetryEvent {
    TelemetryEvent::screen_view(name, None)
}

#[tokio::test(start_paused = true)]
async fn periodic_tick_flushes_buffer() {
    let transport = RecordingTransport::default();
    let dispatcher = dispatcher(transport.clone());
    // bypass the eager trigger so only the timer can deliver
    dispatcher.buffer().enqueue(screen("Home"));

    let handle = dispatcher.start();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(transport.call_count(), 0);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(transport.call_count(), 1);
    assert_eq!(dispatcher.buffer().pending_count(), 0);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn enqueue_into_empty_buffer_flushes_early() {
    let transport = RecordingTransport::default();
    let dispatcher = dispatcher(transport.clone());
    let handle = dispatcher.start();

    dispatcher.enqueue(screen("Home"));
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(transport.call_count(), 1);
    assert_eq!(transport.calls()[0], vec!["Screen View: Home".to_string()]);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_scheduled_flushes() {
    let transport = RecordingTransport::default();
    let dispatcher = dispatcher(transport.clone());
    let handle = dispatcher.start();

    handle.shutdown().await;

    dispatcher.enqueue(screen("Home"));
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(transport.call_count(), 0);
    assert_eq!(dispatcher.buffer().pending_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn independent_pipelines_do_not_share_state() {
    let first = RecordingTransport::default();
    let second = RecordingTransport::default();
    let a = dispatcher(first.clone());
    let b = dispatcher(second.clone());

    a.buffer().enqueue(screen("A"));
    a.flush().await;

    assert_eq!(first.call_count(), 1);
    assert_eq!(second.call_count(), 0);
    assert_eq!(b.buffer().pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_still_delivers() {
    let transport = RecordingTransport::default();
    let dispatcher = dispatcher_every(transport.clone(), Duration::ZERO);
    // timer path
    dispatcher.buffer().enqueue(screen("Home"));

    let handle = dispatcher.start();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!handle.is_finished());
    assert_eq!(transport.call_count(), 1);
    assert_eq!(dispatcher.buffer().pending_count(), 0);

    // eager path
    dispatcher.enqueue(screen("Feed"));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!handle.is_finished());
    assert_eq!(transport.call_count(), 2);
    assert_eq!(dispatcher.buffer().pending_count(), 0);

    handle.shutdown().await;
}
