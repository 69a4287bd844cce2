// ── Mesh-safe minimum-RSSI & band-steering advice ──
//
// Hard invariant: no advice produced here may enable or tighten
// minimum-RSSI or band steering on a mesh-linked device. A min-RSSI
// kick on a mesh parent disconnects every child behind it; on a child
// it severs the uplink itself. Mesh devices get protective entries
// explaining why they are skipped, nothing more.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::mesh::{MeshMap, MeshRole};
use crate::analysis::population::{PopulationProfile, wifi_generation};
use crate::model::{Band, BandSteering, Client, MacAddress, Snapshot};

/// Deviation from the selected threshold beyond which a configured
/// min-RSSI value is called out as suboptimal, in dB.
const DEVIATION_TOLERANCE_DB: i16 = 10;

/// Minimum-RSSI action for a single non-mesh radio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RssiAction {
    /// Min-RSSI is unset; enable it at the selected threshold.
    Enable { threshold_dbm: i16 },
    /// Configured value deviates from the selected threshold by more
    /// than the tolerance.
    Adjust { current_dbm: i16, threshold_dbm: i16 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssiAdvice {
    pub device: MacAddress,
    pub device_name: String,
    pub band: Band,
    pub action: RssiAction,
    pub reason: String,
    /// Wireless clients currently on this radio's band at this AP.
    pub affected_clients: usize,
}

/// Band-steering enablement advice for a non-mesh dual-band AP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteeringAdvice {
    pub device: MacAddress,
    pub device_name: String,
    /// Connected clients capable of 5 GHz or better.
    pub capable_clients: usize,
    pub reason: String,
}

/// Why a device was excluded from min-RSSI/steering advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshProtection {
    pub device: MacAddress,
    pub device_name: String,
    pub role: MeshRole,
    /// Serving remote clients with no viable alternative AP.
    pub coverage_extender: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinRssiReport {
    pub advice: Vec<RssiAdvice>,
    pub steering: Vec<SteeringAdvice>,
    pub protections: Vec<MeshProtection>,
    pub error: Option<String>,
}

/// True when this device is holding up clients that have nowhere
/// better to go. Any one condition is enough.
fn is_coverage_extender(clients: &[&Client]) -> bool {
    let with_signal: Vec<i16> = clients.iter().filter_map(|c| c.signal_dbm).collect();
    if with_signal.is_empty() {
        return false;
    }

    let weak = with_signal.iter().filter(|s| **s < -75).count();
    if weak as f64 / with_signal.len() as f64 > 0.5 {
        return true;
    }

    let mean = with_signal.iter().map(|s| f64::from(*s)).sum::<f64>() / with_signal.len() as f64;
    if mean < -70.0 {
        return true;
    }

    // No other AP heard above -80 dBm: the client is stuck here.
    let stranded = clients
        .iter()
        .filter(|c| c.best_alternate_dbm.is_none_or(|alt| alt <= -80))
        .count();
    stranded as f64 / clients.len() as f64 > 0.3
}

/// Produce min-RSSI and band-steering advice for every access point.
pub fn analyze(snapshot: &Snapshot, mesh: &MeshMap, profile: &PopulationProfile) -> MinRssiReport {
    let mut report = MinRssiReport::default();

    for device in snapshot.devices.iter().filter(|d| d.is_access_point()) {
        let clients: Vec<&Client> = snapshot.wireless_clients_of(&device.mac).collect();
        let role = mesh.role(&device.mac);

        if role.is_protected() {
            let extender = is_coverage_extender(&clients);
            let detail = if extender {
                format!(
                    "{} is a mesh {role} serving remote clients with no viable \
                     alternative AP. Do not enable or tighten min-RSSI or band \
                     steering here: kicked clients would have nowhere to roam \
                     and a mesh uplink drop cascades downstream.",
                    device.display_name(),
                )
            } else {
                format!(
                    "{} is a mesh {role}; min-RSSI and band-steering changes are \
                     withheld to protect the wireless uplink.",
                    device.display_name(),
                )
            };
            report.protections.push(MeshProtection {
                device: device.mac.clone(),
                device_name: device.display_name().to_owned(),
                role,
                coverage_extender: extender,
                detail,
            });
            continue;
        }

        for radio in &device.radios {
            if radio.channel.is_none() {
                continue;
            }
            let threshold = profile.thresholds.for_band(radio.band);
            let on_band = clients
                .iter()
                .filter(|c| c.band == Some(radio.band))
                .count();

            let configured = if radio.min_rssi_enabled {
                radio.min_rssi_dbm
            } else {
                None
            };

            match configured {
                None => report.advice.push(RssiAdvice {
                    device: device.mac.clone(),
                    device_name: device.display_name().to_owned(),
                    band: radio.band,
                    action: RssiAction::Enable {
                        threshold_dbm: threshold,
                    },
                    reason: format!(
                        "Minimum RSSI is not set on the {} radio; enabling it at \
                         {threshold} dBm sheds sticky clients before they drag \
                         down airtime",
                        radio.band
                    ),
                    affected_clients: on_band,
                }),
                Some(current) if (current - threshold).abs() > DEVIATION_TOLERANCE_DB => {
                    report.advice.push(RssiAdvice {
                        device: device.mac.clone(),
                        device_name: device.display_name().to_owned(),
                        band: radio.band,
                        action: RssiAction::Adjust {
                            current_dbm: current,
                            threshold_dbm: threshold,
                        },
                        reason: format!(
                            "Configured minimum RSSI of {current} dBm on the {} radio \
                             is more than {DEVIATION_TOLERANCE_DB} dB from the \
                             {threshold} dBm suited to this client population",
                            radio.band
                        ),
                        affected_clients: on_band,
                    });
                }
                Some(current) => {
                    debug!(
                        device = %device.display_name(),
                        band = %radio.band,
                        current, threshold,
                        "min-RSSI within tolerance"
                    );
                }
            }
        }

        // Band steering only matters when both 2.4 and 5 GHz exist and
        // someone connected can actually use the higher band.
        if device.band_steering == BandSteering::Off
            && device.radio(Band::Ghz2).is_some_and(|r| r.channel.is_some())
            && device.radio(Band::Ghz5).is_some_and(|r| r.channel.is_some())
        {
            let capable = clients
                .iter()
                .filter(|c| {
                    wifi_generation(c.protocol.as_deref(), c.band).is_dual_band_capable()
                })
                .count();
            if capable > 0 {
                report.steering.push(SteeringAdvice {
                    device: device.mac.clone(),
                    device_name: device.display_name().to_owned(),
                    capable_clients: capable,
                    reason: format!(
                        "Band steering is off on {} while {capable} connected \
                         client(s) support 5 GHz; steering moves them off the \
                         congested 2.4 GHz band",
                        device.display_name()
                    ),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::population;
    use crate::analysis::testutil::{ap, ap_on_channel, client_on, wireless_uplink};
    use crate::config::RssiProfiles;
    use crate::model::Radio;
    use crate::patterns::PatternTable;

    fn std_profile() -> PopulationProfile {
        population::profile(&[], &PatternTable::empty(), &RssiProfiles::default())
    }

    fn snapshot(devices: Vec<crate::model::Device>, clients: Vec<Client>) -> Snapshot {
        let mut snap = crate::analysis::testutil::snapshot_of(devices);
        snap.clients = clients;
        snap
    }

    #[test]
    fn mesh_devices_never_get_enable_or_adjust_advice() {
        let parent = ap_on_channel("parent", 1, 1);
        let mut child = ap_on_channel("child", 2, 6);
        child.uplink = Some(wireless_uplink(&parent.mac.to_string(), -62));
        // Both radios have min-RSSI unset, which would trigger advice on
        // a wired AP.
        let devices = vec![parent, child];
        let mesh = MeshMap::resolve(&devices);

        let report = analyze(&snapshot(devices, Vec::new()), &mesh, &std_profile());
        assert!(report.advice.is_empty());
        assert!(report.steering.is_empty());
        assert_eq!(report.protections.len(), 2);
    }

    #[test]
    fn coverage_extender_gets_strongest_protection() {
        let parent = ap_on_channel("parent", 1, 1);
        let mut child = ap_on_channel("child", 2, 6);
        let child_mac = child.mac.to_string();
        child.uplink = Some(wireless_uplink(&parent.mac.to_string(), -62));

        // Three of four clients below -75 dBm.
        let clients = vec![
            client_on(&child_mac, -80),
            client_on(&child_mac, -79),
            client_on(&child_mac, -77),
            client_on(&child_mac, -60),
        ];
        let devices = vec![parent, child];
        let mesh = MeshMap::resolve(&devices);
        let report = analyze(&snapshot(devices, clients), &mesh, &std_profile());

        let protection = report
            .protections
            .iter()
            .find(|p| p.device_name == "child")
            .unwrap();
        assert!(protection.coverage_extender);
        assert!(protection.detail.contains("no viable alternative"));
    }

    #[test]
    fn unset_min_rssi_on_wired_ap_triggers_enable() {
        let device = ap_on_channel("ap-1", 1, 1);
        let devices = vec![device];
        let mesh = MeshMap::resolve(&devices);
        let report = analyze(&snapshot(devices, Vec::new()), &mesh, &std_profile());

        assert_eq!(report.advice.len(), 1);
        assert_eq!(
            report.advice[0].action,
            RssiAction::Enable { threshold_dbm: -75 }
        );
    }

    #[test]
    fn large_deviation_triggers_adjust_small_deviation_does_not() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.radios = vec![
            Radio {
                band: Band::Ghz5,
                channel: Some(36),
                width_mhz: None,
                tx_power_mode: crate::model::TxPowerMode::Auto,
                tx_power_dbm: None,
                min_rssi_enabled: true,
                min_rssi_dbm: Some(-90),
            },
            Radio {
                band: Band::Ghz2,
                channel: Some(6),
                width_mhz: None,
                tx_power_mode: crate::model::TxPowerMode::Auto,
                tx_power_dbm: None,
                min_rssi_enabled: true,
                min_rssi_dbm: Some(-70),
            },
        ];
        let devices = vec![device];
        let mesh = MeshMap::resolve(&devices);
        let report = analyze(&snapshot(devices, Vec::new()), &mesh, &std_profile());

        // 5 GHz: -90 vs -72 deviates by 18. 2.4 GHz: -70 vs -75 is inside
        // the 10 dB tolerance.
        assert_eq!(report.advice.len(), 1);
        assert_eq!(report.advice[0].band, Band::Ghz5);
        assert_eq!(
            report.advice[0].action,
            RssiAction::Adjust {
                current_dbm: -90,
                threshold_dbm: -72,
            }
        );
    }

    #[test]
    fn steering_suggested_only_with_capable_clients() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.band_steering = BandSteering::Off;
        device.radios = vec![
            Radio {
                band: Band::Ghz2,
                channel: Some(1),
                width_mhz: None,
                tx_power_mode: crate::model::TxPowerMode::Auto,
                tx_power_dbm: None,
                min_rssi_enabled: true,
                min_rssi_dbm: Some(-75),
            },
            Radio {
                band: Band::Ghz5,
                channel: Some(36),
                width_mhz: None,
                tx_power_mode: crate::model::TxPowerMode::Auto,
                tx_power_dbm: None,
                min_rssi_enabled: true,
                min_rssi_dbm: Some(-72),
            },
        ];
        let mac = device.mac.to_string();

        // An 802.11ac client can use 5 GHz.
        let capable = client_on(&mac, -55);
        let devices = vec![device];
        let mesh = MeshMap::resolve(&devices);
        let report = analyze(&snapshot(devices.clone(), vec![capable]), &mesh, &std_profile());
        assert_eq!(report.steering.len(), 1);
        assert_eq!(report.steering[0].capable_clients, 1);

        // Nobody connected: nothing to steer.
        let report = analyze(&snapshot(devices, Vec::new()), &mesh, &std_profile());
        assert!(report.steering.is_empty());
    }
}
