// ── Device stability classification ──
//
// Correlates device uptime against the bounded event-log window and
// classifies restarts as manual, isolated, or cyclic. Restart counting
// must only consider device lifecycle events: a busy AP can log dozens
// of client associations per restart, and conflating the two inflates
// the restart count by orders of magnitude.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::issue::{Issue, IssueKind, Severity};
use crate::config::StabilityConfig;
use crate::model::{Device, Event, MacAddress, Snapshot};

const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: u64 = 86_400;

// ── Restart event detection ──────────────────────────────────────────

/// Device lifecycle markers within an event key. Client
/// association/roam/disconnect events never match these.
const LIFECYCLE_MARKERS: [&str; 4] = ["Restarted", "Lost_Contact", "Upgraded", "PowerCycle"];

/// Device subsystem prefixes: access points, switches, gateways.
const DEVICE_PREFIXES: [&str; 3] = ["EVT_AP_", "EVT_SW_", "EVT_GW_"];

/// True iff the event is a device-level lifecycle event (reboot,
/// upgrade, lost contact with the controller).
pub fn is_lifecycle_event(event: &Event) -> bool {
    DEVICE_PREFIXES.iter().any(|p| event.key.starts_with(p))
        && LIFECYCLE_MARKERS.iter().any(|m| event.key.contains(m))
}

/// True iff the restart was user- or upgrade-initiated.
///
/// Controllers mark deliberate restarts with a bare `Restarted` key
/// (versus `RestartedUnknown`) or an `Upgraded` key; messages mention
/// the admin or the upgrade.
fn is_manual_restart(event: &Event) -> bool {
    if event.key.contains("Upgraded") {
        return true;
    }
    if event.key.contains("Restarted") && !event.key.contains("Unknown") {
        return true;
    }
    let msg = event.message.to_lowercase();
    msg.contains("upgrade") || msg.contains("admin")
}

// ── Classification ───────────────────────────────────────────────────

/// How a device's recent restarts classify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "pattern")]
pub enum RestartPattern {
    /// No restarts in the window, or uptime beyond the window entirely.
    Stable,
    /// Exactly one restart, user- or upgrade-initiated. Not a problem.
    ManualSingle,
    /// Single unplanned restart with uptime under 24 h.
    RecentUnplanned { restarts: usize },
    /// Single unplanned restart, uptime between 24 h and 7 d.
    Isolated { restarts: usize },
    /// Repeated rebooting observed directly in the log.
    CyclicObserved { restarts: usize, span_days: f64 },
    /// Repeated rebooting inferred from a stale log span. The daily
    /// rate is an extrapolation, and messaging must say so.
    CyclicEstimated {
        restarts: usize,
        span_days: f64,
        daily_rate: f64,
    },
}

impl RestartPattern {
    pub fn is_cyclic(&self) -> bool {
        matches!(self, Self::CyclicObserved { .. } | Self::CyclicEstimated { .. })
    }
}

/// Per-device stability finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityFinding {
    pub device: MacAddress,
    pub device_name: String,
    pub pattern: RestartPattern,
    /// Actual span of log coverage, in days. Logs may hold less (or
    /// more) than the requested window; this is what was really there.
    pub event_span_days: f64,
}

/// Aggregate stability report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StabilityReport {
    pub findings: Vec<StabilityFinding>,
    pub issues: Vec<Issue>,
    pub error: Option<String>,
}

/// Actual span of the event log in days, regardless of the requested
/// window.
fn event_span_days(events: &[Event]) -> f64 {
    let (min, max) = events.iter().fold((None, None), |(min, max), e| {
        let ts = e.timestamp;
        (
            Some(min.map_or(ts, |m: DateTime<Utc>| m.min(ts))),
            Some(max.map_or(ts, |m: DateTime<Utc>| m.max(ts))),
        )
    });
    match (min, max) {
        (Some(min), Some(max)) => (max - min).num_seconds() as f64 / SECS_PER_DAY as f64,
        _ => 0.0,
    }
}

/// Classify one device. Ordered rules, first match wins.
fn classify(
    device: &Device,
    restarts: &[&Event],
    span_days: f64,
    config: &StabilityConfig,
) -> RestartPattern {
    let uptime = device.uptime_secs.unwrap_or(0);
    let count = restarts.len();

    if count == 0 {
        return RestartPattern::Stable;
    }

    // Rule 1: cyclic — observed directly, or estimated from a stale log.
    if count >= config.cyclic_restart_count {
        return RestartPattern::CyclicObserved {
            restarts: count,
            span_days,
        };
    }
    if span_days > config.stale_span_days
        && uptime < config.estimation_uptime_hours.unsigned_abs() * SECS_PER_HOUR
    {
        let daily_rate = count as f64 / span_days.max(1.0);
        if daily_rate >= config.cyclic_daily_rate {
            return RestartPattern::CyclicEstimated {
                restarts: count,
                span_days,
                daily_rate,
            };
        }
    }

    // Rule 2: single manual restart is expected behavior.
    if count == 1 && restarts.iter().all(|e| is_manual_restart(e)) {
        return RestartPattern::ManualSingle;
    }

    // Rules 3/4: single unplanned restart, graded by recency.
    if uptime < 24 * SECS_PER_HOUR {
        RestartPattern::RecentUnplanned { restarts: count }
    } else {
        RestartPattern::Isolated { restarts: count }
    }
}

fn restart_noun(count: usize) -> &'static str {
    if count == 1 { "restart" } else { "restarts" }
}

fn issue_for(finding: &StabilityFinding) -> Option<Issue> {
    let name = &finding.device_name;
    match &finding.pattern {
        RestartPattern::CyclicObserved { restarts, span_days } => Some(Issue {
            severity: Severity::High,
            kind: IssueKind::CyclicRestart,
            message: format!(
                "{name} is restart-cycling: {restarts} restarts observed in {:.1} days of log coverage",
                span_days
            ),
            device: Some(finding.device.clone()),
            band: None,
            recommendation: Some(
                "Check power delivery (PoE budget, injector, cabling) and firmware stability; \
                 replace hardware if the cycle persists"
                    .into(),
            ),
            penalty: 15.0,
        }),
        RestartPattern::CyclicEstimated {
            restarts,
            span_days,
            daily_rate,
        } => Some(Issue {
            severity: Severity::High,
            kind: IssueKind::CyclicRestart,
            message: format!(
                "{name} appears to be restart-cycling: ~{daily_rate:.1} restarts/day estimated \
                 from {restarts} restarts over {span_days:.1} days of stale log coverage"
            ),
            device: Some(finding.device.clone()),
            band: None,
            recommendation: Some(
                "Log coverage is stale, so this is an estimate. Check power delivery and \
                 firmware stability, and re-run once fresh events accumulate"
                    .into(),
            ),
            penalty: 15.0,
        }),
        RestartPattern::RecentUnplanned { restarts } => Some(Issue {
            severity: Severity::Medium,
            kind: IssueKind::UnplannedRestart,
            message: format!(
                "{name} restarted unexpectedly within the last 24 hours ({restarts} {} observed)",
                restart_noun(*restarts)
            ),
            device: Some(finding.device.clone()),
            band: None,
            recommendation: Some("Watch for recurrence; a single event may be transient".into()),
            penalty: 5.0,
        }),
        RestartPattern::Isolated { restarts } => Some(Issue {
            severity: Severity::Low,
            kind: IssueKind::IsolatedRestart,
            message: format!(
                "{name} had an isolated unplanned restart this week ({restarts} {} observed)",
                restart_noun(*restarts)
            ),
            device: Some(finding.device.clone()),
            band: None,
            recommendation: None,
            penalty: 2.0,
        }),
        RestartPattern::Stable | RestartPattern::ManualSingle => None,
    }
}

/// Classify every device with uptime under the event window.
pub fn analyze(snapshot: &Snapshot, config: &StabilityConfig) -> StabilityReport {
    let mut report = StabilityReport::default();
    let span_days = event_span_days(&snapshot.events);
    let window_secs = config.event_window_days.unsigned_abs() * SECS_PER_DAY;

    for device in &snapshot.devices {
        // Devices up longer than the window have nothing to correlate.
        if device.uptime_secs.is_some_and(|u| u >= window_secs) {
            continue;
        }

        let restarts: Vec<&Event> = snapshot
            .events_for(&device.mac)
            .filter(|e| is_lifecycle_event(e))
            .collect();

        let pattern = classify(device, &restarts, span_days, config);
        debug!(device = %device.display_name(), ?pattern, "stability classified");

        let finding = StabilityFinding {
            device: device.mac.clone(),
            device_name: device.display_name().to_owned(),
            pattern,
            event_span_days: span_days,
        };
        if let Some(issue) = issue_for(&finding) {
            report.issues.push(issue);
        }
        if finding.pattern != RestartPattern::Stable {
            report.findings.push(finding);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testutil::{ap, client_event, lifecycle_event};
    use chrono::{Duration, TimeZone};

    fn cfg() -> StabilityConfig {
        StabilityConfig::default()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).single().expect("valid ts")
    }

    fn snapshot_with(devices: Vec<Device>, events: Vec<Event>) -> Snapshot {
        Snapshot {
            collected_at: now(),
            devices,
            clients: Vec::new(),
            events,
            failures: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[test]
    fn single_unplanned_restart_at_12h_is_recent_not_cyclic() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.uptime_secs = Some(12 * 3600);
        let events = vec![lifecycle_event(
            "aa:00:00:00:00:01",
            "EVT_AP_RestartedUnknown",
            now() - Duration::hours(12),
        )];

        let report = analyze(&snapshot_with(vec![device], events), &cfg());
        assert_eq!(report.findings.len(), 1);
        assert!(matches!(
            report.findings[0].pattern,
            RestartPattern::RecentUnplanned { restarts: 1 }
        ));
        assert_eq!(report.issues[0].severity, Severity::Medium);
    }

    #[test]
    fn three_restarts_in_window_is_cyclic() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.uptime_secs = Some(6 * 3600);
        let events = (1..=3)
            .map(|d| {
                lifecycle_event(
                    "aa:00:00:00:00:01",
                    "EVT_AP_RestartedUnknown",
                    now() - Duration::days(d),
                )
            })
            .collect();

        let report = analyze(&snapshot_with(vec![device], events), &cfg());
        assert!(report.findings[0].pattern.is_cyclic());
        assert_eq!(report.issues[0].severity, Severity::High);
        assert!(report.issues[0].message.contains("observed"));
        assert!(!report.issues[0].message.contains("estimated"));
    }

    #[test]
    fn client_disconnects_do_not_count_as_restarts() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.uptime_secs = Some(12 * 3600);

        let mut events: Vec<Event> = (0..40)
            .map(|i| {
                client_event(
                    "aa:00:00:00:00:01",
                    "EVT_WU_Disconnected",
                    now() - Duration::minutes(i * 7),
                )
            })
            .collect();
        events.push(lifecycle_event(
            "aa:00:00:00:00:01",
            "EVT_AP_RestartedUnknown",
            now() - Duration::hours(12),
        ));

        let report = analyze(&snapshot_with(vec![device], events), &cfg());
        assert!(matches!(
            report.findings[0].pattern,
            RestartPattern::RecentUnplanned { restarts: 1 }
        ));
    }

    #[test]
    fn two_restarts_read_as_plural_in_the_message() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.uptime_secs = Some(12 * 3600);
        let events = vec![
            lifecycle_event(
                "aa:00:00:00:00:01",
                "EVT_AP_RestartedUnknown",
                now() - Duration::hours(12),
            ),
            lifecycle_event(
                "aa:00:00:00:00:01",
                "EVT_AP_Lost_Contact",
                now() - Duration::hours(36),
            ),
        ];

        let report = analyze(&snapshot_with(vec![device], events), &cfg());
        assert!(matches!(
            report.findings[0].pattern,
            RestartPattern::RecentUnplanned { restarts: 2 }
        ));
        assert!(report.issues[0].message.contains("2 restarts observed"));
    }

    #[test]
    fn manual_single_restart_emits_no_issue() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.uptime_secs = Some(12 * 3600);
        let events = vec![lifecycle_event(
            "aa:00:00:00:00:01",
            "EVT_AP_Upgraded",
            now() - Duration::hours(12),
        )];

        let report = analyze(&snapshot_with(vec![device], events), &cfg());
        assert_eq!(report.findings[0].pattern, RestartPattern::ManualSingle);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn stale_span_estimation_is_labeled_estimated() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.uptime_secs = Some(6 * 3600);

        // Two restarts, but the log spans 20+ days: estimation path.
        // With span 20d the naive rate would be low, so use a config
        // with a lower estimation cutoff to drive the branch.
        let mut config = cfg();
        config.cyclic_daily_rate = 0.05;

        let events = vec![
            lifecycle_event(
                "aa:00:00:00:00:01",
                "EVT_AP_RestartedUnknown",
                now() - Duration::hours(2),
            ),
            lifecycle_event(
                "aa:00:00:00:00:01",
                "EVT_AP_RestartedUnknown",
                now() - Duration::days(20),
            ),
        ];

        let report = analyze(&snapshot_with(vec![device], events), &config);
        match &report.findings[0].pattern {
            RestartPattern::CyclicEstimated { daily_rate, .. } => {
                assert!(*daily_rate > 0.05);
            }
            other => panic!("expected estimated cyclic, got {other:?}"),
        }
        assert!(report.issues[0].message.contains("estimated"));
    }

    #[test]
    fn isolated_restart_between_one_and_seven_days() {
        let mut device = ap("ap-1", "aa:00:00:00:00:01");
        device.uptime_secs = Some(3 * 86_400);
        let events = vec![lifecycle_event(
            "aa:00:00:00:00:01",
            "EVT_AP_RestartedUnknown",
            now() - Duration::days(3),
        )];

        let report = analyze(&snapshot_with(vec![device], events), &cfg());
        assert!(matches!(
            report.findings[0].pattern,
            RestartPattern::Isolated { restarts: 1 }
        ));
        assert_eq!(report.issues[0].severity, Severity::Low);
    }
}
