// ── Snapshot: the engine's sole input ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::Client;
use super::device::Device;
use super::event::Event;
use super::mac::MacAddress;

/// Which collector produced (or failed to produce) part of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Collector {
    Devices,
    Clients,
    Events,
}

impl Collector {
    /// Critical collectors make the composite score meaningless when
    /// absent; the scorer returns "unable to calculate" instead of a
    /// number.
    pub fn is_critical(self) -> bool {
        matches!(self, Self::Devices | Self::Clients)
    }
}

/// A collector that could not deliver its part of the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFailure {
    pub collector: Collector,
    pub detail: String,
}

/// Point-in-time controller state plus a bounded look-back event window.
///
/// Immutable for the duration of a run. Analyzers read it and write
/// their own independent result structures; nothing here is shared
/// mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub collected_at: DateTime<Utc>,
    pub devices: Vec<Device>,
    pub clients: Vec<Client>,
    pub events: Vec<Event>,
    /// Collectors that failed; critical ones gate the composite score.
    pub failures: Vec<CollectionFailure>,
    /// Low-severity data-quality notes from the ingestion boundary
    /// (coerced fields, dropped malformed values).
    pub notes: Vec<String>,
}

impl Snapshot {
    /// True when a collector the score depends on failed.
    pub fn has_critical_failure(&self) -> bool {
        self.failures.iter().any(|f| f.collector.is_critical())
    }

    /// Wireless clients currently associated with the given device.
    pub fn wireless_clients_of<'a>(
        &'a self,
        device: &'a MacAddress,
    ) -> impl Iterator<Item = &'a Client> {
        self.clients
            .iter()
            .filter(move |c| !c.wired && c.ap_mac.as_ref() == Some(device))
    }

    /// Events within the look-back window that concern the given device.
    pub fn events_for<'a>(&'a self, device: &'a MacAddress) -> impl Iterator<Item = &'a Event> {
        self.events
            .iter()
            .filter(move |e| e.device_mac.as_ref() == Some(device))
    }
}
