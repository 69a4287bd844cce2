// Raw controller API response types
//
// Models for the controller's legacy JSON API. All responses are wrapped
// in the `Envelope<T>` envelope. Fields use `#[serde(default)]` liberally
// because the API is inconsistent about field presence across firmware
// versions, and a few fields (radio channel, tx power) arrive as either
// numbers or strings — those stay `serde_json::Value` here and are
// coerced at the ingestion boundary in `wavecheck-core`.

use serde::{Deserialize, Serialize};

// ── Response envelope ────────────────────────────────────────────────

/// Standard legacy API response envelope.
///
/// Every endpoint wraps its payload:
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    pub data: Vec<T>,
}

/// Metadata from the envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Device ───────────────────────────────────────────────────────────

/// Device object from `stat/device`.
///
/// The API can return 100+ fields per device. We model the ones the
/// diagnostic engine needs explicitly; everything else lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDevice {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub mac: String,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub upgradable: Option<bool>,
    #[serde(default)]
    pub uptime: Option<i64>,
    /// 0=offline, 1=online, 2=pending, 4=upgrading, 5=provisioning
    #[serde(default)]
    pub state: Option<i32>,
    #[serde(default)]
    pub radio_table: Vec<RawRadio>,
    #[serde(default)]
    pub uplink: Option<RawUplink>,
    #[serde(default)]
    pub port_table: Vec<RawPort>,
    /// Band-steering mode: "off", "prefer_5g", "equal".
    #[serde(default)]
    pub bandsteering_mode: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Radio entry nested inside `RawDevice::radio_table`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRadio {
    /// Band identifier: "ng" (2.4 GHz), "na" (5 GHz), "6e" (6 GHz).
    #[serde(default)]
    pub radio: Option<String>,
    /// Channel — number, or the string "auto". Coerced downstream.
    #[serde(default)]
    pub channel: Option<serde_json::Value>,
    /// Channel width in MHz ("ht" in controller speak).
    #[serde(default)]
    pub ht: Option<serde_json::Value>,
    /// "auto", "medium", "high", "low", or "custom".
    #[serde(default)]
    pub tx_power_mode: Option<String>,
    /// Transmit power in dBm — number or string. Coerced downstream.
    #[serde(default)]
    pub tx_power: Option<serde_json::Value>,
    #[serde(default)]
    pub min_rssi_enabled: Option<bool>,
    #[serde(default)]
    pub min_rssi: Option<i64>,
}

/// Uplink descriptor nested inside `RawDevice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUplink {
    /// "wire" or "wireless".
    #[serde(rename = "type", default)]
    pub uplink_type: Option<String>,
    /// MAC of the upstream device.
    #[serde(default)]
    pub uplink_mac: Option<String>,
    /// Uplink signal strength in dBm (wireless uplinks only).
    #[serde(default)]
    pub rssi: Option<i64>,
}

/// Switch port entry with traffic counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPort {
    #[serde(default)]
    pub port_idx: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub up: Option<bool>,
    #[serde(default)]
    pub rx_broadcast: Option<u64>,
    #[serde(default)]
    pub rx_multicast: Option<u64>,
    #[serde(default)]
    pub tx_broadcast: Option<u64>,
    #[serde(default)]
    pub tx_multicast: Option<u64>,
}

// ── Client (station) ─────────────────────────────────────────────────

/// Connected client from `stat/sta`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawClientEntry {
    pub mac: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub oui: Option<String>,
    #[serde(default)]
    pub is_wired: Option<bool>,
    /// Signal strength in dBm. Some firmware reports a positive
    /// magnitude; normalization happens downstream.
    #[serde(default)]
    pub signal: Option<i64>,
    #[serde(default)]
    pub ap_mac: Option<String>,
    /// Band identifier of the serving radio: "ng", "na", "6e".
    #[serde(default)]
    pub radio: Option<String>,
    /// Negotiated protocol: "ng", "ac", "ax", "be".
    #[serde(default)]
    pub radio_proto: Option<String>,
    #[serde(default)]
    pub tx_rate: Option<u64>,
    #[serde(default)]
    pub nss: Option<u32>,
    /// Best signal at which any *other* AP observed this station, if the
    /// controller reports neighbor data.
    #[serde(default)]
    pub alt_ap_signal: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Event ────────────────────────────────────────────────────────────

/// Historical log entry from `stat/event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event key, e.g. `EVT_AP_RestartedUnknown`.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
    /// MAC of the access point involved, if any.
    #[serde(default)]
    pub ap: Option<String>,
    /// MAC of the switch involved, if any.
    #[serde(default)]
    pub sw: Option<String>,
    /// MAC of the client involved, if any.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub subsystem: Option<String>,
}

// ── Counter sample ───────────────────────────────────────────────────

/// Hourly counter sample from `stat/report/hourly.ap` / `.sw`.
///
/// Loosely typed — the attribute set varies by report type and
/// firmware version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCounterSample {
    /// Epoch milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub rx_packets: Option<f64>,
    #[serde(default)]
    pub tx_packets: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
