// ── Recommendation assembly ──
//
// Folds every analyzer's proposals and the actionable issues into one
// ordered list. Entries carry device, band, current and proposed
// values so a change-applier can act without re-deriving context, and
// so the history tracker can key them for suppression.

use serde::{Deserialize, Serialize};

use crate::analysis::channels::ChannelReport;
use crate::analysis::issue::{Issue, IssueKind, Severity};
use crate::analysis::min_rssi::{MinRssiReport, RssiAction};
use crate::analysis::power::PowerReport;
use crate::analysis::stability::StabilityReport;
use crate::analysis::storm::StormReport;
use crate::model::{Band, MacAddress, Snapshot};

/// Ordering priority. Derived `Ord` sorts `Critical` first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl From<Severity> for Priority {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::High => Self::High,
            Severity::Medium => Self::Medium,
            Severity::Low => Self::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecommendationKind {
    ChangeChannel,
    EnableMinRssi,
    AdjustMinRssi,
    EnableBandSteering,
    AdjustTxPower,
    UpdateFirmware,
    Investigate,
}

/// One actionable entry in the final ordered list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub device: Option<MacAddress>,
    pub device_name: Option<String>,
    pub band: Option<Band>,
    /// Currently configured value, if any.
    pub current: Option<String>,
    /// Value to apply. Present for every setting-change kind; absent
    /// for pure investigations.
    pub proposed: Option<String>,
    pub reason: String,
    pub affected_clients: usize,
}

impl Recommendation {
    /// History key for deduplication: only setting-change entries with
    /// a concrete target are tracked. The kind is part of the key so a
    /// channel move and a min-RSSI change on the same radio never share
    /// an entry. Device-wide changes (band steering) key with a `-`
    /// band slot.
    pub fn dedup_key(&self) -> Option<String> {
        let device = self.device.as_ref()?;
        self.proposed.as_ref()?;
        let band = self.band.map_or("-", |b| b.token());
        Some(format!("{device}|{band}|{}", self.kind))
    }
}

fn wireless_on_band(snapshot: &Snapshot, device: &MacAddress, band: Band) -> usize {
    snapshot
        .wireless_clients_of(device)
        .filter(|c| c.band == Some(band))
        .count()
}

/// Storms and cyclic restarts take a site down in practice; everything
/// else keeps its issue severity.
fn issue_priority(issue: &Issue) -> Priority {
    match issue.kind {
        IssueKind::BroadcastStorm | IssueKind::CyclicRestart => Priority::Critical,
        _ => issue.severity.into(),
    }
}

fn from_issue(issue: &Issue, kind: RecommendationKind, snapshot: &Snapshot) -> Recommendation {
    let affected = match (&issue.device, issue.band) {
        (Some(device), Some(band)) => wireless_on_band(snapshot, device, band),
        (Some(device), None) => snapshot.wireless_clients_of(device).count(),
        _ => 0,
    };
    Recommendation {
        kind,
        priority: issue_priority(issue),
        device: issue.device.clone(),
        device_name: None,
        band: issue.band,
        current: None,
        proposed: None,
        reason: issue
            .recommendation
            .clone()
            .unwrap_or_else(|| issue.message.clone()),
        affected_clients: affected,
    }
}

/// Merge all analyzer outputs into one priority-ordered list.
pub fn assemble(
    snapshot: &Snapshot,
    channels: &ChannelReport,
    power: &PowerReport,
    storms: &StormReport,
    stability: &StabilityReport,
    min_rssi: &MinRssiReport,
    firmware_issues: &[Issue],
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    for proposal in &channels.proposals {
        out.push(Recommendation {
            kind: RecommendationKind::ChangeChannel,
            priority: if proposal
                .current
                .is_some_and(|c| !super::channels::STANDARD_CHANNELS.contains(&c))
            {
                Priority::High
            } else {
                Priority::Medium
            },
            device: Some(proposal.device.clone()),
            device_name: Some(proposal.device_name.clone()),
            band: Some(proposal.band),
            current: proposal.current.map(|c| c.to_string()),
            proposed: Some(proposal.proposed.to_string()),
            reason: proposal.reason.clone(),
            affected_clients: wireless_on_band(snapshot, &proposal.device, proposal.band),
        });
    }

    for advice in &min_rssi.advice {
        let (kind, current, proposed) = match advice.action {
            RssiAction::Enable { threshold_dbm } => (
                RecommendationKind::EnableMinRssi,
                None,
                threshold_dbm.to_string(),
            ),
            RssiAction::Adjust {
                current_dbm,
                threshold_dbm,
            } => (
                RecommendationKind::AdjustMinRssi,
                Some(current_dbm.to_string()),
                threshold_dbm.to_string(),
            ),
        };
        out.push(Recommendation {
            kind,
            priority: Priority::Medium,
            device: Some(advice.device.clone()),
            device_name: Some(advice.device_name.clone()),
            band: Some(advice.band),
            current,
            proposed: Some(proposed),
            reason: advice.reason.clone(),
            affected_clients: advice.affected_clients,
        });
    }

    for steering in &min_rssi.steering {
        out.push(Recommendation {
            kind: RecommendationKind::EnableBandSteering,
            priority: Priority::Low,
            device: Some(steering.device.clone()),
            device_name: Some(steering.device_name.clone()),
            band: None,
            current: Some("off".into()),
            proposed: Some("prefer_5g".into()),
            reason: steering.reason.clone(),
            affected_clients: steering.capable_clients,
        });
    }

    for issue in &power.issues {
        out.push(from_issue(issue, RecommendationKind::AdjustTxPower, snapshot));
    }
    for issue in &storms.issues {
        out.push(from_issue(issue, RecommendationKind::Investigate, snapshot));
    }
    for issue in &stability.issues {
        out.push(from_issue(issue, RecommendationKind::Investigate, snapshot));
    }
    for issue in firmware_issues {
        out.push(from_issue(issue, RecommendationKind::UpdateFirmware, snapshot));
    }

    // Priority first, then reach, then a stable tiebreak so repeated
    // runs render identically.
    out.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(b.affected_clients.cmp(&a.affected_clients))
            .then_with(|| a.device.cmp(&b.device))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::channels::ChannelProposal;
    use crate::analysis::issue::{IssueKind, Severity};
    use crate::analysis::min_rssi::RssiAdvice;
    use crate::analysis::testutil::snapshot_of;

    fn base_snapshot() -> Snapshot {
        snapshot_of(Vec::new())
    }

    fn storm_issue() -> Issue {
        Issue {
            severity: Severity::High,
            kind: IssueKind::BroadcastStorm,
            message: "storm".into(),
            device: Some(MacAddress::new("bb:00:00:00:00:01")),
            band: None,
            recommendation: Some("find the loop".into()),
            penalty: 8.0,
        }
    }

    #[test]
    fn storms_outrank_channel_moves() {
        let channels = ChannelReport {
            proposals: vec![ChannelProposal {
                device: MacAddress::new("aa:00:00:00:00:01"),
                device_name: "ap-1".into(),
                band: Band::Ghz2,
                current: Some(1),
                proposed: 11,
                reason: "overloaded".into(),
            }],
            ..ChannelReport::default()
        };
        let storms = StormReport {
            issues: vec![storm_issue()],
            ..StormReport::default()
        };
        let recs = assemble(
            &base_snapshot(),
            &channels,
            &PowerReport::default(),
            &storms,
            &StabilityReport::default(),
            &MinRssiReport::default(),
            &[],
        );
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].priority, Priority::Critical);
        assert_eq!(recs[0].kind, RecommendationKind::Investigate);
        assert_eq!(recs[1].kind, RecommendationKind::ChangeChannel);
    }

    #[test]
    fn equal_priority_sorts_by_affected_clients() {
        let min_rssi = MinRssiReport {
            advice: vec![
                RssiAdvice {
                    device: MacAddress::new("aa:00:00:00:00:01"),
                    device_name: "small".into(),
                    band: Band::Ghz5,
                    action: RssiAction::Enable { threshold_dbm: -72 },
                    reason: "enable".into(),
                    affected_clients: 2,
                },
                RssiAdvice {
                    device: MacAddress::new("aa:00:00:00:00:02"),
                    device_name: "big".into(),
                    band: Band::Ghz5,
                    action: RssiAction::Enable { threshold_dbm: -72 },
                    reason: "enable".into(),
                    affected_clients: 9,
                },
            ],
            ..MinRssiReport::default()
        };
        let recs = assemble(
            &base_snapshot(),
            &ChannelReport::default(),
            &PowerReport::default(),
            &StormReport::default(),
            &StabilityReport::default(),
            &min_rssi,
            &[],
        );
        assert_eq!(recs[0].device_name.as_deref(), Some("big"));
        assert_eq!(recs[1].device_name.as_deref(), Some("small"));
    }

    #[test]
    fn dedup_key_requires_device_and_proposal() {
        let rec = Recommendation {
            kind: RecommendationKind::ChangeChannel,
            priority: Priority::Medium,
            device: Some(MacAddress::new("aa:00:00:00:00:01")),
            device_name: None,
            band: Some(Band::Ghz2),
            current: Some("1".into()),
            proposed: Some("11".into()),
            reason: "x".into(),
            affected_clients: 0,
        };
        assert_eq!(
            rec.dedup_key().as_deref(),
            Some("aa:00:00:00:00:01|2g|change_channel")
        );

        let investigate = Recommendation {
            proposed: None,
            ..rec
        };
        assert!(investigate.dedup_key().is_none());
    }

    #[test]
    fn distinct_kinds_on_one_radio_key_separately() {
        let channel = Recommendation {
            kind: RecommendationKind::ChangeChannel,
            priority: Priority::High,
            device: Some(MacAddress::new("aa:00:00:00:00:01")),
            device_name: None,
            band: Some(Band::Ghz2),
            current: Some("8".into()),
            proposed: Some("6".into()),
            reason: "off-standard".into(),
            affected_clients: 4,
        };
        let min_rssi = Recommendation {
            kind: RecommendationKind::EnableMinRssi,
            current: None,
            proposed: Some("-75".into()),
            ..channel.clone()
        };
        assert_ne!(channel.dedup_key(), min_rssi.dedup_key());
    }

    #[test]
    fn steering_recommendations_are_keyed() {
        let steering = Recommendation {
            kind: RecommendationKind::EnableBandSteering,
            priority: Priority::Low,
            device: Some(MacAddress::new("aa:00:00:00:00:01")),
            device_name: Some("ap-1".into()),
            band: None,
            current: Some("off".into()),
            proposed: Some("prefer_5g".into()),
            reason: "dual-band clients on 2.4".into(),
            affected_clients: 5,
        };
        assert_eq!(
            steering.dedup_key().as_deref(),
            Some("aa:00:00:00:00:01|-|enable_band_steering")
        );
    }
}
