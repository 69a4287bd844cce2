// ── Radio transmit-power sanity ──
//
// Manually-pinned low power is a frequent cause of "WiFi is slow at
// the far end of the building" complaints. Only radios the operator
// actually controls are checked: mesh-linked radios carry the uplink
// (their power is load-bearing), disabled radios have no channel, and
// auto mode is the controller's business.

use serde::{Deserialize, Serialize};

use crate::analysis::issue::{Issue, IssueKind, Severity};
use crate::analysis::mesh::MeshMap;
use crate::model::Device;

/// Manual transmit power below this is flagged.
const MIN_SANE_POWER_DBM: i16 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerReport {
    pub issues: Vec<Issue>,
    pub error: Option<String>,
}

/// Check every non-mesh, enabled, manual-power radio.
pub fn analyze(devices: &[Device], mesh: &MeshMap) -> PowerReport {
    let mut report = PowerReport::default();

    for device in devices.iter().filter(|d| d.is_access_point()) {
        // Mesh radios are exempt: reducing power on a mesh link starves
        // the uplink, and the mesh analyzer owns that problem space.
        if mesh.is_protected(&device.mac) {
            continue;
        }

        for radio in &device.radios {
            if radio.channel.is_none() || !radio.tx_power_mode.is_manual() {
                continue;
            }
            let Some(power) = radio.tx_power_dbm else {
                continue;
            };

            if power == 0 {
                report.issues.push(Issue {
                    severity: Severity::Medium,
                    kind: IssueKind::ZeroTxPower,
                    message: format!(
                        "{} {} radio has manual transmit power set to 0 dBm",
                        device.display_name(),
                        radio.band
                    ),
                    device: Some(device.mac.clone()),
                    band: Some(radio.band),
                    recommendation: Some(
                        "0 dBm is almost never intentional; switch to auto or set a real value"
                            .into(),
                    ),
                    penalty: 4.0,
                });
            } else if power < MIN_SANE_POWER_DBM {
                report.issues.push(Issue {
                    severity: Severity::Medium,
                    kind: IssueKind::LowTxPower,
                    message: format!(
                        "{} {} radio transmit power is pinned at {power} dBm",
                        device.display_name(),
                        radio.band
                    ),
                    device: Some(device.mac.clone()),
                    band: Some(radio.band),
                    recommendation: Some(format!(
                        "Raise to at least {MIN_SANE_POWER_DBM} dBm or return the radio to auto"
                    )),
                    penalty: 3.0,
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testutil::{ap, manual_radio, wireless_uplink};
    use crate::model::{Band, TxPowerMode};

    #[test]
    fn low_manual_power_is_flagged() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.radios = vec![manual_radio(Band::Ghz5, Some(36), 7)];
        let report = analyze(&[device], &MeshMap::default());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::LowTxPower);
    }

    #[test]
    fn zero_power_is_an_anomaly() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.radios = vec![manual_radio(Band::Ghz2, Some(6), 0)];
        let report = analyze(&[device], &MeshMap::default());
        assert_eq!(report.issues[0].kind, IssueKind::ZeroTxPower);
    }

    #[test]
    fn auto_mode_and_disabled_radios_are_exempt() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        let mut auto = manual_radio(Band::Ghz5, Some(36), 7);
        auto.tx_power_mode = TxPowerMode::Auto;
        let disabled = manual_radio(Band::Ghz2, None, 7);
        device.radios = vec![auto, disabled];
        let report = analyze(&[device], &MeshMap::default());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn mesh_radios_are_exempt() {
        let parent = ap("parent", "aa:00:00:00:00:01");
        let mut child = ap("child", "aa:00:00:00:00:02");
        child.uplink = Some(wireless_uplink("aa:00:00:00:00:01", -60));
        child.radios = vec![manual_radio(Band::Ghz5, Some(36), 4)];

        let devices = vec![parent, child];
        let mesh = MeshMap::resolve(&devices);
        let report = analyze(&devices, &mesh);
        assert!(report.issues.is_empty());
    }
}
