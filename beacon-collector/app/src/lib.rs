#![warn(rust_2018_idioms)]
//! Ingestion and query service for client telemetry.
//!
//! Accepts single events and batches over HTTP, persists them through the
//! [`port::EventStore`] port and serves list, lookup and aggregate queries.

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod handler;
pub mod healthcheck;
pub mod port;

pub use app::{AppState, router};
pub use healthcheck::{healthcheck, healthcheck_with_port};
