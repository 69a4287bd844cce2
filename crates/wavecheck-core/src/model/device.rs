// ── Device domain types ──

use serde::{Deserialize, Serialize};
use strum::Display;

use super::mac::MacAddress;

/// Canonical device kind -- normalized from the controller's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DeviceKind {
    AccessPoint,
    Switch,
    Gateway,
    Other,
}

/// Radio band.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
pub enum Band {
    #[strum(serialize = "2.4 GHz")]
    Ghz2,
    #[strum(serialize = "5 GHz")]
    Ghz5,
    #[strum(serialize = "6 GHz")]
    Ghz6,
}

impl Band {
    /// Short token used in history-store keys and machine output.
    pub fn token(self) -> &'static str {
        match self {
            Self::Ghz2 => "2g",
            Self::Ghz5 => "5g",
            Self::Ghz6 => "6g",
        }
    }
}

/// Transmit power mode of a radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxPowerMode {
    Auto,
    Low,
    Medium,
    High,
    /// Operator-set dBm value.
    Custom,
}

impl TxPowerMode {
    /// True when the operator has pinned an explicit dBm value.
    pub fn is_manual(self) -> bool {
        matches!(self, Self::Custom)
    }
}

/// One band on an access point. Owned exclusively by its [`Device`];
/// identified by (device, band).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Radio {
    pub band: Band,
    /// Assigned channel. `None` means the radio is disabled or in
    /// auto-channel mode with no current assignment.
    pub channel: Option<u16>,
    pub width_mhz: Option<u16>,
    pub tx_power_mode: TxPowerMode,
    pub tx_power_dbm: Option<i16>,
    pub min_rssi_enabled: bool,
    pub min_rssi_dbm: Option<i16>,
}

/// How a device reaches the rest of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UplinkType {
    Wired,
    Wireless,
}

/// Uplink descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Uplink {
    pub uplink_type: UplinkType,
    /// MAC of the upstream device (the mesh parent, for wireless uplinks).
    pub remote_mac: Option<MacAddress>,
    /// Uplink signal strength in dBm (wireless uplinks only).
    pub signal_dbm: Option<i16>,
}

/// Switch port with flood-traffic counters.
///
/// Counters are cumulative since the switch last booted; the storm
/// analyzer normalizes them by uptime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchPort {
    pub index: u32,
    pub name: Option<String>,
    pub up: bool,
    pub rx_broadcast: u64,
    pub rx_multicast: u64,
    pub tx_broadcast: u64,
    pub tx_multicast: u64,
}

impl SwitchPort {
    /// Total broadcast+multicast packets in both directions.
    pub fn flood_total(&self) -> u64 {
        self.rx_broadcast + self.rx_multicast + self.tx_broadcast + self.tx_multicast
    }

    /// True when the port transmits more flood traffic than it receives.
    pub fn is_tx_dominant(&self) -> bool {
        self.tx_broadcast + self.tx_multicast > self.rx_broadcast + self.rx_multicast
    }
}

/// Band-steering configuration of an access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandSteering {
    Off,
    Prefer5g,
    Balanced,
    Unknown,
}

/// The canonical Device type: an access point, switch, or gateway.
///
/// Read-only — reconstructed fresh each analysis run from the external
/// snapshot and never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub mac: MacAddress,
    pub name: Option<String>,
    pub kind: DeviceKind,
    pub uptime_secs: Option<u64>,

    // Interfaces
    pub radios: Vec<Radio>,
    pub ports: Vec<SwitchPort>,

    // Uplink
    pub uplink: Option<Uplink>,

    // Steering
    pub band_steering: BandSteering,

    // Firmware
    pub firmware_version: Option<String>,
    pub update_available: bool,
}

impl Device {
    /// Human-facing name, falling back to the MAC.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.mac.as_str())
    }

    pub fn is_access_point(&self) -> bool {
        matches!(self.kind, DeviceKind::AccessPoint)
    }

    pub fn is_switch(&self) -> bool {
        matches!(self.kind, DeviceKind::Switch)
    }

    /// The radio serving the given band, if present.
    pub fn radio(&self, band: Band) -> Option<&Radio> {
        self.radios.iter().find(|r| r.band == band)
    }
}
