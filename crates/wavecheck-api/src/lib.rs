//! Thin async client for the controller's legacy JSON API.
//!
//! This crate only knows how to *fetch*: cookie-session authentication,
//! the `{ meta, data }` response envelope, and the handful of endpoints
//! the diagnostic engine needs (devices, clients, events, hourly
//! counters). It performs no analysis and exposes raw payload types
//! with lenient deserialization — `wavecheck-core` owns the conversion
//! into canonical domain types.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod clients;
mod devices;
mod events;
mod stats;

pub use client::{ControllerClient, ControllerPlatform};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
