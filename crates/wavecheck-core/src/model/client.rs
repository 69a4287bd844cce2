// ── Client (station) domain types ──

use serde::{Deserialize, Serialize};

use super::device::Band;
use super::mac::MacAddress;

/// Normalize a reported signal strength to negative dBm.
///
/// Some controllers report signal as a positive magnitude (e.g. `67`
/// meaning −67 dBm); others report it already negative. Idempotent:
/// `normalize_rssi(normalize_rssi(x)) == normalize_rssi(x)`, and the
/// result is never positive.
pub fn normalize_rssi(raw: i64) -> i16 {
    let dbm = if raw > 0 { -raw } else { raw };
    dbm.clamp(i64::from(i16::MIN), 0) as i16
}

/// A station associated with a device. Ephemeral, read-only per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub mac: MacAddress,
    pub hostname: Option<String>,
    /// Manufacturer string from the OUI registry, if the controller
    /// resolved it.
    pub oui: Option<String>,
    pub wired: bool,

    // Association
    pub ap_mac: Option<MacAddress>,
    pub band: Option<Band>,

    // Radio capability
    /// Negotiated protocol token ("ng", "ac", "ax", "be").
    pub protocol: Option<String>,
    pub tx_rate_kbps: Option<u64>,
    pub spatial_streams: Option<u32>,

    // Signal
    /// Signal strength, normalized to negative dBm.
    pub signal_dbm: Option<i16>,
    /// Best signal at which any *other* AP observed this station.
    /// `None` means no alternative AP observed it at all.
    pub best_alternate_dbm: Option<i16>,
}

impl Client {
    /// Display name: hostname, falling back to the MAC.
    pub fn display_name(&self) -> &str {
        self.hostname.as_deref().unwrap_or_else(|| self.mac.as_str())
    }
}
