pub mod client;
pub mod transmission;

pub use client::{ClientConfig, ClientError, ClientStats, ClientStatsSnapshot, HttpClient};
pub use transmission::{BatchTransmitter, classify_status};

use crate::buffer::Batch;
use std::fmt;
use std::future::Future;

/// Result of one delivery attempt for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Worth sending again on a later cycle.
    Retryable(RetryReason),
    /// The server refused the data; resending cannot succeed.
    Rejected(RejectReason),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    Timeout,
    Unreachable(String),
    ServerError(u16),
    UnexpectedStatus(u16),
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Unreachable(detail) => write!(f, "server unreachable: {detail}"),
            Self::ServerError(status) => write!(f, "server error: HTTP {status}"),
            Self::UnexpectedStatus(status) => write!(f, "unexpected status: HTTP {status}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Status { status: u16, body: String },
    Encode(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, body } if body.is_empty() => write!(f, "HTTP {status}"),
            Self::Status { status, body } => write!(f, "HTTP {status}: {body}"),
            Self::Encode(detail) => write!(f, "payload encoding failed: {detail}"),
        }
    }
}

/// One network round-trip per batch. Implementations never retry internally.
pub trait Transport: Send + Sync {
    fn send(&self, batch: &Batch) -> impl Future<Output = DeliveryOutcome> + Send;
}
