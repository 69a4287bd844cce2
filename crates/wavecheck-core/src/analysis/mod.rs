// ── Analysis orchestration ──
//
// Each analyzer is a pure function over the immutable snapshot and
// writes its own result structure; nothing here shares mutable state.
// The one order-sensitive step is the history filter, which must run
// after every recommendation-producing analyzer so its read-modify-
// write cycle sees the complete list.

pub mod assemble;
pub mod channels;
pub mod issue;
pub mod mesh;
pub mod min_rssi;
pub mod population;
pub mod power;
pub mod score;
pub mod stability;
pub mod storm;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::history::{HistoryStore, Suppressed};
use crate::model::{Device, Snapshot};
use crate::patterns::PatternTable;

use assemble::Recommendation;
use issue::{Issue, IssueKind, Severity};
use mesh::MeshMap;
use min_rssi::MinRssiReport;
use population::PopulationProfile;
use score::{HealthCategory, HealthScore};

/// Everything one diagnostic pass produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,

    // Per-component results
    pub mesh: MeshMap,
    pub stability: stability::StabilityReport,
    pub channels: channels::ChannelReport,
    pub power: power::PowerReport,
    pub storms: storm::StormReport,
    pub population: PopulationProfile,
    pub min_rssi: MinRssiReport,

    // Composite
    pub categories: Vec<HealthCategory>,
    pub overall: HealthScore,

    // Final ordered recommendation list, after history suppression
    pub recommendations: Vec<Recommendation>,
    pub suppressed: Vec<Suppressed>,

    /// Data-quality notes from ingestion.
    pub notes: Vec<String>,
}

/// Pending firmware updates feed the security category: stale firmware
/// is the closest thing to a security posture signal the controller
/// exposes per device.
fn firmware_issues(devices: &[Device]) -> Vec<Issue> {
    devices
        .iter()
        .filter(|d| d.update_available)
        .map(|d| Issue {
            severity: Severity::Low,
            kind: IssueKind::FirmwareOutdated,
            message: format!(
                "{} has a firmware update available{}",
                d.display_name(),
                d.firmware_version
                    .as_deref()
                    .map(|v| format!(" (running {v})"))
                    .unwrap_or_default()
            ),
            device: Some(d.mac.clone()),
            band: None,
            recommendation: Some("Schedule the update in a maintenance window".into()),
            penalty: 5.0,
        })
        .collect()
}

/// Run the full diagnostic pass over one snapshot.
///
/// The caller owns persistence: `history` is mutated in memory and
/// should be saved once this returns.
pub fn run_diagnostics(
    snapshot: &Snapshot,
    config: &EngineConfig,
    patterns: &PatternTable,
    history: &mut HistoryStore,
) -> AnalysisReport {
    let mesh = MeshMap::resolve(&snapshot.devices);
    info!(
        devices = snapshot.devices.len(),
        clients = snapshot.clients.len(),
        mesh_protected = mesh.protected_count(),
        "starting diagnostic pass"
    );

    let stability = stability::analyze(snapshot, &config.stability);
    let channels = channels::analyze(&snapshot.devices);
    let power = power::analyze(&snapshot.devices, &mesh);
    let storms = storm::analyze(snapshot, &config.storm);
    let population = population::profile(&snapshot.clients, patterns, &config.rssi);
    let min_rssi = min_rssi::analyze(snapshot, &mesh, &population);
    let firmware = firmware_issues(&snapshot.devices);

    let rf_issues: Vec<Issue> = channels
        .issues
        .iter()
        .chain(&power.issues)
        .cloned()
        .collect();
    let infra_issues: Vec<Issue> = storms
        .issues
        .iter()
        .chain(&stability.issues)
        .cloned()
        .collect();

    let scored = score::compute(
        snapshot,
        &config.weights,
        rf_issues,
        infra_issues,
        firmware.clone(),
    );

    let proposed = assemble::assemble(
        snapshot, &channels, &power, &storms, &stability, &min_rssi, &firmware,
    );

    // History must run last and see the complete list.
    let outcome = history.filter(proposed, &config.history, snapshot.collected_at);
    let pruned = history.prune(config.history.retention_days, snapshot.collected_at);
    info!(
        accepted = outcome.accepted.len(),
        suppressed = outcome.suppressed.len(),
        pruned,
        "diagnostic pass complete"
    );

    AnalysisReport {
        generated_at: snapshot.collected_at,
        mesh,
        stability,
        channels,
        power,
        storms,
        population,
        min_rssi,
        categories: scored.categories,
        overall: scored.overall,
        recommendations: outcome.accepted,
        suppressed: outcome.suppressed,
        notes: snapshot.notes.clone(),
    }
}

// ── Shared test fixtures ─────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{DateTime, Utc};

    use crate::model::{
        Band, BandSteering, Client, Device, DeviceKind, Event, MacAddress, Radio, Snapshot,
        SwitchPort, TxPowerMode, Uplink, UplinkType,
    };
    use crate::patterns::{OsFamily, OsPattern, PatternTable};

    pub fn ap(name: &str, mac: &str) -> Device {
        Device {
            mac: MacAddress::new(mac),
            name: Some(name.to_owned()),
            kind: DeviceKind::AccessPoint,
            uptime_secs: Some(30 * 86_400),
            radios: Vec::new(),
            ports: Vec::new(),
            uplink: None,
            band_steering: BandSteering::Unknown,
            firmware_version: None,
            update_available: false,
        }
    }

    /// An AP with a single 2.4 GHz radio on the given channel; the MAC
    /// is derived from `idx` so fixtures stay distinct.
    pub fn ap_on_channel(name: &str, idx: u8, channel: u16) -> Device {
        let mut device = ap(name, &format!("aa:00:00:00:00:{idx:02x}"));
        device.radios = vec![Radio {
            band: Band::Ghz2,
            channel: Some(channel),
            width_mhz: Some(20),
            tx_power_mode: TxPowerMode::Auto,
            tx_power_dbm: None,
            min_rssi_enabled: false,
            min_rssi_dbm: None,
        }];
        device
    }

    pub fn wireless_uplink(parent_mac: &str, rssi: i16) -> Uplink {
        Uplink {
            uplink_type: UplinkType::Wireless,
            remote_mac: Some(MacAddress::new(parent_mac)),
            signal_dbm: Some(rssi),
        }
    }

    pub fn manual_radio(band: Band, channel: Option<u16>, power_dbm: i16) -> Radio {
        Radio {
            band,
            channel,
            width_mhz: None,
            tx_power_mode: TxPowerMode::Custom,
            tx_power_dbm: Some(power_dbm),
            min_rssi_enabled: false,
            min_rssi_dbm: None,
        }
    }

    pub fn switch(name: &str, mac: &str, uptime_secs: u64) -> Device {
        Device {
            mac: MacAddress::new(mac),
            name: Some(name.to_owned()),
            kind: DeviceKind::Switch,
            uptime_secs: Some(uptime_secs),
            radios: Vec::new(),
            ports: Vec::new(),
            uplink: None,
            band_steering: BandSteering::Unknown,
            firmware_version: None,
            update_available: false,
        }
    }

    pub fn port(index: u32, rx_flood: u64, tx_flood: u64) -> SwitchPort {
        SwitchPort {
            index,
            name: None,
            up: true,
            rx_broadcast: rx_flood,
            rx_multicast: 0,
            tx_broadcast: tx_flood,
            tx_multicast: 0,
        }
    }

    pub fn snapshot_of(devices: Vec<Device>) -> Snapshot {
        Snapshot {
            collected_at: Utc::now(),
            devices,
            clients: Vec::new(),
            events: Vec::new(),
            failures: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn lifecycle_event(device_mac: &str, key: &str, timestamp: DateTime<Utc>) -> Event {
        Event {
            timestamp,
            device_mac: Some(MacAddress::new(device_mac)),
            client_mac: None,
            key: key.to_owned(),
            message: String::new(),
        }
    }

    /// A client-level event that still carries the AP's MAC, the way
    /// controllers log associations and disconnects.
    pub fn client_event(device_mac: &str, key: &str, timestamp: DateTime<Utc>) -> Event {
        Event {
            timestamp,
            device_mac: Some(MacAddress::new(device_mac)),
            client_mac: Some(MacAddress::new("cc:00:00:00:00:99")),
            key: key.to_owned(),
            message: "client roamed or disconnected".to_owned(),
        }
    }

    pub fn wclient(hostname: &str, protocol: &str, band: Band, signal_dbm: i16) -> Client {
        Client {
            mac: MacAddress::new("cc:00:00:00:00:01"),
            hostname: Some(hostname.to_owned()),
            oui: None,
            wired: false,
            ap_mac: None,
            band: Some(band),
            protocol: Some(protocol.to_owned()),
            tx_rate_kbps: None,
            spatial_streams: None,
            signal_dbm: Some(signal_dbm),
            best_alternate_dbm: None,
        }
    }

    /// A wireless 802.11ac client associated with the given AP.
    pub fn client_on(ap_mac: &str, signal_dbm: i16) -> Client {
        Client {
            mac: MacAddress::new("cc:00:00:00:00:02"),
            hostname: None,
            oui: None,
            wired: false,
            ap_mac: Some(MacAddress::new(ap_mac)),
            band: Some(Band::Ghz5),
            protocol: Some("ac".to_owned()),
            tx_rate_kbps: None,
            spatial_streams: None,
            signal_dbm: Some(signal_dbm),
            best_alternate_dbm: Some(-65),
        }
    }

    pub fn ios_patterns() -> PatternTable {
        PatternTable {
            os_patterns: vec![OsPattern {
                family: OsFamily::Ios,
                hostname: vec!["iphone".into(), "ipad".into()],
                oui: vec!["apple".into()],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testutil::{ap_on_channel, client_on, snapshot_of, wireless_uplink};

    fn run(snapshot: &Snapshot) -> AnalysisReport {
        let mut history = HistoryStore::in_memory();
        run_diagnostics(
            snapshot,
            &EngineConfig::default(),
            &PatternTable::empty(),
            &mut history,
        )
    }

    #[test]
    fn mesh_devices_never_receive_enable_recommendations() {
        let parent = ap_on_channel("parent", 1, 1);
        let mut child = ap_on_channel("child", 2, 6);
        let child_mac = child.mac.clone();
        child.uplink = Some(wireless_uplink(&parent.mac.to_string(), -60));
        let parent_mac = parent.mac.clone();

        let report = run(&snapshot_of(vec![parent, child]));

        for rec in &report.recommendations {
            let targets_mesh = rec.device.as_ref() == Some(&parent_mac)
                || rec.device.as_ref() == Some(&child_mac);
            if targets_mesh {
                assert!(
                    !matches!(
                        rec.kind,
                        assemble::RecommendationKind::EnableMinRssi
                            | assemble::RecommendationKind::AdjustMinRssi
                            | assemble::RecommendationKind::EnableBandSteering
                    ),
                    "mesh device received {:?}",
                    rec.kind
                );
            }
        }
        assert_eq!(report.min_rssi.protections.len(), 2);
    }

    #[test]
    fn healthy_site_scores_high_with_no_recommendations() {
        let mut snapshot = snapshot_of(vec![
            ap_on_channel("ap-0", 0, 1),
            ap_on_channel("ap-1", 1, 6),
            ap_on_channel("ap-2", 2, 11),
        ]);
        // Strong clients on every AP, min-RSSI already sensible.
        for device in &mut snapshot.devices {
            device.radios[0].min_rssi_enabled = true;
            device.radios[0].min_rssi_dbm = Some(-75);
            snapshot.clients.push(client_on(device.mac.as_str(), -52));
        }

        let report = run(&snapshot);
        match report.overall {
            HealthScore::Score { value, grade } => {
                assert!(value >= 90.0, "expected an A site, got {value}");
                assert_eq!(grade, score::Grade::A);
            }
            HealthScore::Unavailable { ref reason } => panic!("score withheld: {reason}"),
        }
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn second_run_suppresses_identical_recommendations() {
        // One AP off-standard: produces a channel move every pass.
        let snapshot = snapshot_of(vec![
            ap_on_channel("ap-0", 0, 1),
            ap_on_channel("ap-1", 1, 6),
            ap_on_channel("ap-2", 2, 8),
        ]);

        let mut history = HistoryStore::in_memory();
        let config = EngineConfig::default();
        let patterns = PatternTable::empty();

        let first = run_diagnostics(&snapshot, &config, &patterns, &mut history);
        let channel_moves = |r: &AnalysisReport| {
            r.recommendations
                .iter()
                .filter(|rec| rec.kind == assemble::RecommendationKind::ChangeChannel)
                .count()
        };
        assert_eq!(channel_moves(&first), 1);

        let second = run_diagnostics(&snapshot, &config, &patterns, &mut history);
        assert_eq!(channel_moves(&second), 0);
        assert!(!second.suppressed.is_empty());
    }

    #[test]
    fn firmware_updates_surface_in_security_category() {
        let mut snapshot = snapshot_of(vec![ap_on_channel("ap-0", 0, 1)]);
        snapshot.devices[0].update_available = true;
        snapshot.devices[0].firmware_version = Some("6.5.28".into());

        let report = run(&snapshot);
        let security = report
            .categories
            .iter()
            .find(|c| c.kind == score::CategoryKind::Security)
            .unwrap();
        assert!((security.score - 95.0).abs() < f64::EPSILON);
        assert!(
            report
                .recommendations
                .iter()
                .any(|r| r.kind == assemble::RecommendationKind::UpdateFirmware)
        );
    }
}
