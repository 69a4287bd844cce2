//! Canonical domain model.
//!
//! Read-only types reconstructed fresh each analysis run from the raw
//! API snapshot (see [`crate::convert`]). The engine never mutates
//! them; analyzers only read the snapshot and write their own result
//! structures.

pub mod client;
pub mod device;
pub mod event;
pub mod mac;
pub mod snapshot;

pub use client::{Client, normalize_rssi};
pub use device::{
    Band, BandSteering, Device, DeviceKind, Radio, SwitchPort, TxPowerMode, Uplink, UplinkType,
};
pub use event::Event;
pub use mac::MacAddress;
pub use snapshot::{CollectionFailure, Collector, Snapshot};
