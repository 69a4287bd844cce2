//! Diagnostic and recommendation engine for WiFi/switch networks.
//!
//! This crate owns the business logic of wavecheck: it takes a
//! point-in-time [`Snapshot`] of controller state (devices, clients,
//! events) and produces a weighted 0–100 health score with letter
//! grade, a severity-classified issue list, and a deduplicated,
//! mesh-safety-constrained list of configuration recommendations.
//!
//! - **[`analysis`]** — the analyzer components: mesh topology
//!   resolution, device stability classification from event
//!   correlation, RF health (channel balance, transmit power,
//!   broadcast storms), client population profiling with adaptive
//!   thresholds, mesh-gated min-RSSI/band-steering advice, composite
//!   scoring, and recommendation assembly. All are pure functions over
//!   the immutable snapshot; [`analysis::run_diagnostics`] orchestrates
//!   them in a single pass.
//!
//! - **[`HistoryStore`]** — the only stateful component: a durable
//!   record of past recommendations keyed by `(device, band, kind)` that
//!   suppresses oscillating or repeated advice across runs.
//!
//! - **Domain model** ([`model`]) — canonical read-only types
//!   (`Device`, `Radio`, `Client`, `Event`, `Snapshot`) reconstructed
//!   fresh each run from the API snapshot via [`convert`].
//!
//! The engine never talks HTTP and never applies configuration
//! changes — fetching lives in `wavecheck-api`, applying is a separate
//! concern entirely.

pub mod analysis;
pub mod config;
pub mod convert;
pub mod error;
pub mod history;
pub mod model;
pub mod patterns;

// ── Primary re-exports ──────────────────────────────────────────────
pub use analysis::{AnalysisReport, run_diagnostics};
pub use config::EngineConfig;
pub use error::CoreError;
pub use history::{HistoryEntry, HistoryStore, SuppressReason};
pub use patterns::PatternTable;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Band, Client, CollectionFailure, Collector, Device, DeviceKind, Event, MacAddress, Radio,
    Snapshot, SwitchPort, TxPowerMode, Uplink, UplinkType,
};

pub use analysis::issue::{Issue, IssueKind, Severity};
pub use analysis::score::{Grade, HealthCategory, HealthScore};
