// ── 2.4 GHz channel balance ──
//
// Only channels 1, 6, and 11 are non-overlapping on 2.4 GHz; a healthy
// site spreads its APs roughly evenly across them. The imbalance test
// uses a +1.5 slack over the even split so a normal 3-way distribution
// (e.g. 3/2/2 across seven APs) never flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::issue::{Issue, IssueKind, Severity};
use crate::model::{Band, Device, MacAddress};

/// The non-overlapping 2.4 GHz channel set.
pub const STANDARD_CHANNELS: [u16; 3] = [1, 6, 11];

/// A proposed channel move, fed through the recommendation history
/// tracker before it reaches the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelProposal {
    pub device: MacAddress,
    pub device_name: String,
    pub band: Band,
    pub current: Option<u16>,
    pub proposed: u16,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelReport {
    pub issues: Vec<Issue>,
    pub proposals: Vec<ChannelProposal>,
    /// AP count per 2.4 GHz channel, for reporting.
    pub distribution: BTreeMap<u16, usize>,
    pub error: Option<String>,
}

/// Analyze 2.4 GHz channel distribution across all access points.
pub fn analyze(devices: &[Device]) -> ChannelReport {
    let mut report = ChannelReport::default();

    // (device, channel) for every AP with an assigned 2.4 GHz channel.
    let assignments: Vec<(&Device, u16)> = devices
        .iter()
        .filter(|d| d.is_access_point())
        .filter_map(|d| d.radio(Band::Ghz2).and_then(|r| r.channel).map(|c| (d, c)))
        .collect();

    for (_, channel) in &assignments {
        *report.distribution.entry(*channel).or_insert(0) += 1;
    }

    let total = assignments.len();
    if total == 0 {
        return report;
    }
    let expected = total as f64 / STANDARD_CHANNELS.len() as f64;

    // Hard violations: anything off 1/6/11 overlaps two neighbors at once.
    for (device, channel) in &assignments {
        if !STANDARD_CHANNELS.contains(channel) {
            let proposed = least_loaded_channel(&report.distribution);
            report.issues.push(Issue {
                severity: Severity::High,
                kind: IssueKind::NonStandardChannel,
                message: format!(
                    "{} is on 2.4 GHz channel {channel}, which overlaps adjacent channels",
                    device.display_name()
                ),
                device: Some(device.mac.clone()),
                band: Some(Band::Ghz2),
                recommendation: Some(format!("Move to channel {proposed}")),
                penalty: 6.0,
            });
            report.proposals.push(ChannelProposal {
                device: device.mac.clone(),
                device_name: device.display_name().to_owned(),
                band: Band::Ghz2,
                current: Some(*channel),
                proposed,
                reason: format!("channel {channel} overlaps adjacent 2.4 GHz channels"),
            });
        }
    }

    // Imbalance across the standard set.
    for channel in STANDARD_CHANNELS {
        let count = report.distribution.get(&channel).copied().unwrap_or(0);
        if count as f64 > expected + 1.5 {
            report.issues.push(Issue {
                severity: Severity::Medium,
                kind: IssueKind::ChannelImbalance,
                message: format!(
                    "2.4 GHz channel {channel} carries {count} APs (about {expected:.1} expected per channel)"
                ),
                device: None,
                band: Some(Band::Ghz2),
                recommendation: Some(format!(
                    "Redistribute APs from channel {channel} toward the least-loaded standard channel"
                )),
                penalty: 4.0,
            });

            // Propose one move per run: iterative rebalancing avoids
            // flip-flopping several APs at once.
            let target = least_loaded_channel(&report.distribution);
            if target != channel {
                if let Some((device, _)) = assignments
                    .iter()
                    .filter(|(_, c)| *c == channel)
                    .min_by_key(|(d, _)| d.mac.clone())
                {
                    report.proposals.push(ChannelProposal {
                        device: device.mac.clone(),
                        device_name: device.display_name().to_owned(),
                        band: Band::Ghz2,
                        current: Some(channel),
                        proposed: target,
                        reason: format!("channel {channel} is overloaded ({count} APs)"),
                    });
                }
            }
        }
    }

    report
}

/// The standard channel currently carrying the fewest APs.
fn least_loaded_channel(distribution: &BTreeMap<u16, usize>) -> u16 {
    STANDARD_CHANNELS
        .iter()
        .copied()
        .min_by_key(|c| distribution.get(c).copied().unwrap_or(0))
        .unwrap_or(1)
}
