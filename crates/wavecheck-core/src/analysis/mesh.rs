// ── Mesh topology resolution ──
//
// Classifies each device's relationship to its uplink. The resulting
// roles hard-gate every downstream recommendation that could sever a
// wireless uplink (min-RSSI, band steering): a wrong answer here does
// not degrade a score, it drops APs off the network.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Device, MacAddress, UplinkType};

/// A device's mesh role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum MeshRole {
    /// Wired uplink, no wireless children.
    Wired,
    /// Uplinks wirelessly to a parent AP.
    Child,
    /// Serves as another AP's wireless uplink target.
    Parent,
    /// Both child of one AP and parent to another — the most sensitive
    /// case: changes here can cascade-disconnect everything downstream.
    Relay,
}

impl MeshRole {
    /// True for any role that participates in a mesh link. Protected
    /// devices never receive min-RSSI or band-steering recommendations.
    pub fn is_protected(self) -> bool {
        !matches!(self, Self::Wired)
    }
}

/// True iff the device reaches the network over a wireless uplink.
/// Missing uplink data is treated as "not mesh".
pub fn is_mesh_child(device: &Device) -> bool {
    device
        .uplink
        .as_ref()
        .is_some_and(|u| u.uplink_type == UplinkType::Wireless)
}

/// True iff any other device's wireless uplink terminates at `device`.
pub fn is_mesh_parent(device: &Device, all: &[Device]) -> bool {
    all.iter().any(|other| {
        other.mac != device.mac
            && other.uplink.as_ref().is_some_and(|u| {
                u.uplink_type == UplinkType::Wireless && u.remote_mac.as_ref() == Some(&device.mac)
            })
    })
}

/// Resolved mesh roles for every device in the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshMap {
    roles: HashMap<MacAddress, MeshRole>,
}

impl MeshMap {
    /// Classify every device's mesh role.
    pub fn resolve(devices: &[Device]) -> Self {
        let mut roles = HashMap::with_capacity(devices.len());
        for device in devices {
            let child = is_mesh_child(device);
            let parent = is_mesh_parent(device, devices);
            let role = match (child, parent) {
                (true, true) => MeshRole::Relay,
                (true, false) => MeshRole::Child,
                (false, true) => MeshRole::Parent,
                (false, false) => MeshRole::Wired,
            };
            roles.insert(device.mac.clone(), role);
        }
        Self { roles }
    }

    /// Role of the given device. Devices absent from the snapshot are
    /// treated as wired.
    pub fn role(&self, mac: &MacAddress) -> MeshRole {
        self.roles.get(mac).copied().unwrap_or(MeshRole::Wired)
    }

    /// True when the device participates in any mesh link.
    pub fn is_protected(&self, mac: &MacAddress) -> bool {
        self.role(mac).is_protected()
    }

    /// Iterate all (device, role) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&MacAddress, MeshRole)> {
        self.roles.iter().map(|(mac, role)| (mac, *role))
    }

    /// Number of mesh-protected devices.
    pub fn protected_count(&self) -> usize {
        self.roles.values().filter(|r| r.is_protected()).count()
    }
}
