use super::{DeliveryOutcome, HttpClient, RejectReason, RetryReason, Transport};
use crate::buffer::Batch;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, warn};

const MAX_REJECT_BODY: usize = 512;

/// Maps an HTTP status onto a delivery outcome.
pub fn classify_status(status: StatusCode, body: String) -> DeliveryOutcome {
    if status.is_success() {
        DeliveryOutcome::Delivered
    } else if status.is_client_error() {
        DeliveryOutcome::Rejected(RejectReason::Status {
            status: status.as_u16(),
            body,
        })
    } else if status.is_server_error() {
        DeliveryOutcome::Retryable(RetryReason::ServerError(status.as_u16()))
    } else {
        DeliveryOutcome::Retryable(RetryReason::UnexpectedStatus(status.as_u16()))
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_REJECT_BODY {
        let mut end = MAX_REJECT_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

/// Sends batches to the collector's batch endpoint as `{"events": [...]}`.
#[derive(Debug, Clone)]
pub struct BatchTransmitter {
    client: Arc<HttpClient>,
}

impl BatchTransmitter {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    fn build_headers(batch: &Batch) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // uuid strings and decimal counts are always valid header values
        if let Ok(id) = HeaderValue::from_str(batch.id()) {
            headers.insert(HeaderName::from_static("x-batch-id"), id);
        }
        headers.insert(
            HeaderName::from_static("x-batch-size"),
            HeaderValue::from(batch.size()),
        );
        headers
    }

    async fn deliver(&self, batch: &Batch) -> DeliveryOutcome {
        let payload = match serde_json::to_vec(&batch.payload()) {
            Ok(payload) => payload,
            Err(e) => return DeliveryOutcome::Rejected(RejectReason::Encode(e.to_string())),
        };
        let bytes_sent = payload.len();

        let request = self
            .client
            .client
            .post(self.client.batch_url.clone())
            .headers(Self::build_headers(batch))
            .body(payload)
            .send();

        let start = Instant::now();
        let response = match timeout(self.client.config.timeout, request).await {
            Err(_) => return DeliveryOutcome::Retryable(RetryReason::Timeout),
            Ok(Err(e)) if e.is_timeout() => return DeliveryOutcome::Retryable(RetryReason::Timeout),
            Ok(Err(e)) => return DeliveryOutcome::Retryable(RetryReason::Unreachable(e.to_string())),
            Ok(Ok(response)) => response,
        };
        let latency = start.elapsed();

        let status = response.status();
        self.client.stats.record_request(status.is_success(), latency);

        let body = if status.is_client_error() {
            truncate_body(response.text().await.unwrap_or_default())
        } else {
            String::new()
        };

        debug!(
            batch_id = batch.id(),
            status = status.as_u16(),
            bytes_sent,
            latency_ms = latency.as_millis() as u64,
            "Batch request completed"
        );
        classify_status(status, body)
    }
}

impl Transport for BatchTransmitter {
    async fn send(&self, batch: &Batch) -> DeliveryOutcome {
        let outcome = self.deliver(batch).await;
        if let DeliveryOutcome::Retryable(reason) = &outcome {
            warn!(batch_id = batch.id(), size = batch.size(), %reason, "Batch delivery failed");
        }
        outcome
    }
}
