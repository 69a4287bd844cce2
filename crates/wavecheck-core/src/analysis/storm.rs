// ── Broadcast/multicast storm detection ──
//
// Switches flood broadcast traffic to every port, so raw counters look
// alarming on perfectly healthy networks. A port is only flagged when
// its flood rate clears an absolute floor AND stands well above its own
// switch's per-port average — both conditions together isolate a true
// anomaly from normal flood-to-all-ports behavior.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::issue::{Issue, IssueKind, Severity};
use crate::config::StormConfig;
use crate::model::{Device, MacAddress, Snapshot};

/// One port's normalized flood rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortRate {
    pub switch: MacAddress,
    pub switch_name: String,
    pub port_index: u32,
    pub port_name: Option<String>,
    /// Broadcast+multicast packets per hour of switch uptime.
    pub rate_per_hour: f64,
    pub tx_dominant: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StormReport {
    pub issues: Vec<Issue>,
    /// Ports that could not be rated (no uptime to normalize against).
    pub error: Option<String>,
}

fn rate_ports(switch: &Device) -> Option<Vec<PortRate>> {
    let uptime_hours = switch.uptime_secs? as f64 / 3_600.0;
    if uptime_hours < 1.0 {
        // Counters right after boot are too noisy to normalize.
        return None;
    }
    Some(
        switch
            .ports
            .iter()
            .filter(|p| p.up)
            .map(|p| PortRate {
                switch: switch.mac.clone(),
                switch_name: switch.display_name().to_owned(),
                port_index: p.index,
                port_name: p.name.clone(),
                rate_per_hour: p.flood_total() as f64 / uptime_hours,
                tx_dominant: p.is_tx_dominant(),
            })
            .collect(),
    )
}

/// Rate every switch port and flag anomalies.
pub fn analyze(snapshot: &Snapshot, config: &StormConfig) -> StormReport {
    let mut report = StormReport::default();
    let mut unrated = 0_usize;
    let mut total_switches = 0_usize;

    for switch in snapshot.devices.iter().filter(|d| d.is_switch()) {
        total_switches += 1;
        let Some(rates) = rate_ports(switch) else {
            unrated += 1;
            continue;
        };
        if rates.is_empty() {
            continue;
        }

        let average = rates.iter().map(|r| r.rate_per_hour).sum::<f64>() / rates.len() as f64;
        debug!(switch = %switch.display_name(), average, "port flood rates computed");

        for rate in &rates {
            let label = rate
                .port_name
                .clone()
                .unwrap_or_else(|| format!("port {}", rate.port_index));

            if rate.rate_per_hour > config.storm_floor
                && rate.rate_per_hour > config.storm_avg_multiplier * average
            {
                report.issues.push(Issue {
                    severity: Severity::High,
                    kind: IssueKind::BroadcastStorm,
                    message: format!(
                        "{} {label}: {:.0} broadcast/multicast pkts/hr, {:.1}x the switch average",
                        rate.switch_name,
                        rate.rate_per_hour,
                        rate.rate_per_hour / average.max(1.0),
                    ),
                    device: Some(rate.switch.clone()),
                    band: None,
                    recommendation: Some(
                        "Identify the attached device; look for a loop, a misbehaving NIC, \
                         or chatty discovery traffic that belongs in its own VLAN"
                            .into(),
                    ),
                    penalty: 8.0,
                });
            } else if rate.tx_dominant
                && rate.rate_per_hour > config.chatty_floor
                && rate.rate_per_hour > config.chatty_avg_multiplier * average
            {
                report.issues.push(Issue {
                    severity: Severity::Low,
                    kind: IssueKind::ChattyDevice,
                    message: format!(
                        "{} {label} transmits {:.0} flood pkts/hr, above its switch's norm",
                        rate.switch_name, rate.rate_per_hour,
                    ),
                    device: Some(rate.switch.clone()),
                    band: None,
                    recommendation: Some(
                        "Likely a chatty device (mDNS/SSDP heavy); consider VLAN isolation".into(),
                    ),
                    penalty: 2.0,
                });
            }
        }
    }

    if total_switches > 0 && unrated == total_switches {
        report.error =
            Some("no switch reported usable uptime; flood rates could not be determined".into());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testutil::{port, snapshot_of, switch};

    fn storm_cfg() -> StormConfig {
        StormConfig::default()
    }

    #[test]
    fn uniform_flood_traffic_is_not_a_storm() {
        // All ports near the average: flooding to all ports is normal.
        let mut sw = switch("sw-1", "bb:00:00:00:00:01", 10 * 3_600);
        sw.ports = (1..=4).map(|i| port(i, 120_000, 120_000)).collect();
        let report = analyze(&snapshot_of(vec![sw]), &storm_cfg());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn single_hot_port_is_a_storm() {
        let mut sw = switch("sw-1", "bb:00:00:00:00:01", 10 * 3_600);
        sw.ports = (1..=5).map(|i| port(i, 20_000, 20_000)).collect();
        // 2,000,000 pkts over 10h = 200,000/hr: over the floor and more
        // than 3x the per-port average even with itself included.
        sw.ports.push(port(6, 1_000_000, 1_000_000));
        let report = analyze(&snapshot_of(vec![sw]), &storm_cfg());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::BroadcastStorm);
        assert_eq!(report.issues[0].severity, Severity::High);
    }

    #[test]
    fn below_floor_never_flags_even_if_above_average() {
        // 3x the average but far under the absolute floor.
        let mut sw = switch("sw-1", "bb:00:00:00:00:01", 10 * 3_600);
        sw.ports = vec![port(1, 1_000, 1_000), port(2, 30_000, 1_000)];
        let report = analyze(&snapshot_of(vec![sw]), &storm_cfg());
        assert!(
            report
                .issues
                .iter()
                .all(|i| i.kind != IssueKind::BroadcastStorm)
        );
    }

    #[test]
    fn tx_dominant_mid_rate_port_is_chatty() {
        let mut sw = switch("sw-1", "bb:00:00:00:00:01", 10 * 3_600);
        let mut hot = port(3, 10_000, 250_000);
        hot.name = Some("printer".into());
        sw.ports = vec![port(1, 20_000, 20_000), port(2, 20_000, 20_000), hot];
        let report = analyze(&snapshot_of(vec![sw]), &storm_cfg());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::ChattyDevice);
    }

    #[test]
    fn missing_uptime_degrades_to_error() {
        let mut sw = switch("sw-1", "bb:00:00:00:00:01", 0);
        sw.uptime_secs = None;
        sw.ports = vec![port(1, 1_000_000, 1_000_000)];
        let report = analyze(&snapshot_of(vec![sw]), &storm_cfg());
        assert!(report.issues.is_empty());
        assert!(report.error.is_some());
    }
}
