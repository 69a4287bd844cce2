// ── Event domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// A historical log entry from the controller's event log.
///
/// Used only for correlation within a bounded look-back window; the
/// engine never persists events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    /// MAC of the device (AP/switch/gateway) the event concerns, if any.
    pub device_mac: Option<MacAddress>,
    /// MAC of the client the event concerns, if any.
    pub client_mac: Option<MacAddress>,
    /// Controller event key, e.g. `EVT_AP_RestartedUnknown`.
    pub key: String,
    pub message: String,
}
