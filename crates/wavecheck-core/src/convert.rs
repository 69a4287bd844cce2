// ── API-to-domain type conversions ──
//
// Bridges raw `wavecheck_api` response types into canonical
// `wavecheck_core::model` domain types. This is the single place where
// defaulting and coercion happen: malformed or wrong-typed fields are
// coerced to a safe absent/zero value and recorded as a low-severity
// data-quality note — never fatal, and never re-checked downstream.

use chrono::{DateTime, Utc};

use wavecheck_api::models::{RawClientEntry, RawDevice, RawEvent, RawPort, RawRadio, RawUplink};

use crate::model::{
    Band, BandSteering, Client, CollectionFailure, Device, DeviceKind, Event, MacAddress, Radio,
    Snapshot, SwitchPort, TxPowerMode, Uplink, UplinkType, normalize_rssi,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Coerce a loosely-typed JSON value to an unsigned integer.
///
/// Accepts numbers and numeric strings. `"auto"`, other non-numeric
/// strings, and anything else coerce to `None`.
fn coerce_u16(value: Option<&serde_json::Value>) -> Option<u16> {
    match value? {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_i16(value: Option<&serde_json::Value>) -> Option<i16> {
    match value? {
        serde_json::Value::Number(n) => n.as_i64().and_then(|v| i16::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Convert an epoch-milliseconds timestamp to `DateTime<Utc>`.
fn epoch_ms_to_datetime(epoch_ms: Option<i64>) -> Option<DateTime<Utc>> {
    epoch_ms.and_then(DateTime::from_timestamp_millis)
}

// ── Device ─────────────────────────────────────────────────────────

/// Infer `DeviceKind` from the controller's `type` field.
fn infer_device_kind(device_type: Option<&str>) -> DeviceKind {
    match device_type {
        Some("uap") => DeviceKind::AccessPoint,
        Some("usw") => DeviceKind::Switch,
        Some("ugw" | "udm" | "uxg") => DeviceKind::Gateway,
        _ => DeviceKind::Other,
    }
}

fn convert_band(radio: Option<&str>) -> Option<Band> {
    match radio {
        Some("ng") => Some(Band::Ghz2),
        Some("na") => Some(Band::Ghz5),
        Some("6e" | "6g") => Some(Band::Ghz6),
        _ => None,
    }
}

fn convert_power_mode(mode: Option<&str>) -> TxPowerMode {
    match mode {
        Some("low") => TxPowerMode::Low,
        Some("medium") => TxPowerMode::Medium,
        Some("high") => TxPowerMode::High,
        Some("custom") => TxPowerMode::Custom,
        _ => TxPowerMode::Auto,
    }
}

fn convert_radio(raw: &RawRadio, device: &str, notes: &mut Vec<String>) -> Option<Radio> {
    let Some(band) = convert_band(raw.radio.as_deref()) else {
        notes.push(format!(
            "{device}: unrecognized radio band {:?}, radio skipped",
            raw.radio
        ));
        return None;
    };

    let channel = coerce_u16(raw.channel.as_ref());
    if raw.channel.as_ref().is_some_and(|v| !v.is_null()) && channel.is_none() {
        // "auto" is expected; anything else is worth a note.
        let is_auto = raw.channel.as_ref().and_then(|v| v.as_str()) == Some("auto");
        if !is_auto {
            notes.push(format!(
                "{device}: non-numeric channel {:?} on {band} treated as unassigned",
                raw.channel
            ));
        }
    }

    Some(Radio {
        band,
        channel,
        width_mhz: coerce_u16(raw.ht.as_ref()),
        tx_power_mode: convert_power_mode(raw.tx_power_mode.as_deref()),
        tx_power_dbm: coerce_i16(raw.tx_power.as_ref()),
        min_rssi_enabled: raw.min_rssi_enabled.unwrap_or(false),
        min_rssi_dbm: raw.min_rssi.and_then(|v| i16::try_from(v).ok()),
    })
}

fn convert_uplink(raw: &RawUplink) -> Option<Uplink> {
    let uplink_type = match raw.uplink_type.as_deref() {
        Some("wireless") => UplinkType::Wireless,
        Some("wire") => UplinkType::Wired,
        // Missing or unknown uplink data is treated as "not mesh".
        _ => return None,
    };
    Some(Uplink {
        uplink_type,
        remote_mac: raw.uplink_mac.as_deref().map(MacAddress::new),
        signal_dbm: raw.rssi.map(normalize_rssi),
    })
}

fn convert_port(raw: &RawPort) -> Option<SwitchPort> {
    Some(SwitchPort {
        index: raw.port_idx?,
        name: raw.name.clone(),
        up: raw.up.unwrap_or(false),
        rx_broadcast: raw.rx_broadcast.unwrap_or(0),
        rx_multicast: raw.rx_multicast.unwrap_or(0),
        tx_broadcast: raw.tx_broadcast.unwrap_or(0),
        tx_multicast: raw.tx_multicast.unwrap_or(0),
    })
}

fn convert_band_steering(mode: Option<&str>) -> BandSteering {
    match mode {
        Some("off") => BandSteering::Off,
        Some("prefer_5g") => BandSteering::Prefer5g,
        Some("equal") => BandSteering::Balanced,
        _ => BandSteering::Unknown,
    }
}

/// Convert a raw device, appending data-quality notes for coerced fields.
pub fn device(raw: &RawDevice, notes: &mut Vec<String>) -> Device {
    let mac = MacAddress::new(&raw.mac);
    let label = raw.name.clone().unwrap_or_else(|| mac.to_string());

    let radios = raw
        .radio_table
        .iter()
        .filter_map(|r| convert_radio(r, &label, notes))
        .collect();

    let uptime_secs = match raw.uptime {
        Some(u) if u >= 0 => Some(u.unsigned_abs()),
        Some(u) => {
            notes.push(format!("{label}: negative uptime {u} treated as unknown"));
            None
        }
        None => None,
    };

    Device {
        mac,
        name: raw.name.clone(),
        kind: infer_device_kind(raw.device_type.as_deref()),
        uptime_secs,
        radios,
        ports: raw.port_table.iter().filter_map(convert_port).collect(),
        uplink: raw.uplink.as_ref().and_then(convert_uplink),
        band_steering: convert_band_steering(raw.bandsteering_mode.as_deref()),
        firmware_version: raw.version.clone(),
        update_available: raw.upgradable.unwrap_or(false),
    }
}

// ── Client ─────────────────────────────────────────────────────────

pub fn client(raw: &RawClientEntry) -> Client {
    Client {
        mac: MacAddress::new(&raw.mac),
        hostname: raw.hostname.clone().or_else(|| raw.name.clone()),
        oui: raw.oui.clone(),
        wired: raw.is_wired.unwrap_or(false),
        ap_mac: raw.ap_mac.as_deref().map(MacAddress::new),
        band: convert_band(raw.radio.as_deref()),
        protocol: raw.radio_proto.clone(),
        tx_rate_kbps: raw.tx_rate,
        spatial_streams: raw.nss,
        signal_dbm: raw.signal.map(normalize_rssi),
        best_alternate_dbm: raw.alt_ap_signal.map(normalize_rssi),
    }
}

// ── Event ──────────────────────────────────────────────────────────

/// Convert a raw event. Entries without a parseable timestamp are
/// dropped (they cannot participate in window correlation).
pub fn event(raw: &RawEvent) -> Option<Event> {
    let timestamp = epoch_ms_to_datetime(raw.time)?;
    let device_mac = raw
        .ap
        .as_deref()
        .or(raw.sw.as_deref())
        .map(MacAddress::new);
    Some(Event {
        timestamp,
        device_mac,
        client_mac: raw.user.as_deref().map(MacAddress::new),
        key: raw.key.clone().unwrap_or_default(),
        message: raw.msg.clone().unwrap_or_default(),
    })
}

// ── Snapshot assembly ──────────────────────────────────────────────

/// Assemble a snapshot from converted parts plus collection failures.
pub fn snapshot(
    collected_at: DateTime<Utc>,
    raw_devices: &[RawDevice],
    raw_clients: &[RawClientEntry],
    raw_events: &[RawEvent],
    failures: Vec<CollectionFailure>,
) -> Snapshot {
    let mut notes = Vec::new();

    let devices = raw_devices
        .iter()
        .map(|d| device(d, &mut notes))
        .collect::<Vec<_>>();
    let clients = raw_clients.iter().map(client).collect::<Vec<_>>();

    let dropped_before = raw_events.len();
    let events = raw_events.iter().filter_map(event).collect::<Vec<_>>();
    if events.len() < dropped_before {
        notes.push(format!(
            "{} event(s) without a timestamp dropped",
            dropped_before - events.len()
        ));
    }

    Snapshot {
        collected_at,
        devices,
        clients,
        events,
        failures,
        notes,
    }
}
