// ── Composite health scoring ──
//
// Four weighted categories combine into one 0-100 score. Penalty-based
// categories start at 100 and lose points per issue; the client
// category is instead the mean of a continuous per-client quality
// curve, so one very weak client moves the needle proportionally
// rather than tripping a step function.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::analysis::issue::Issue;
use crate::config::CategoryWeights;
use crate::model::Snapshot;

/// Letter grade for an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(value: f64) -> Self {
        if value >= 90.0 {
            Self::A
        } else if value >= 80.0 {
            Self::B
        } else if value >= 70.0 {
            Self::C
        } else if value >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategoryKind {
    Rf,
    Client,
    Infrastructure,
    Security,
}

/// One scored category with the issues that shaped it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCategory {
    pub kind: CategoryKind,
    pub score: f64,
    pub weight: f64,
    pub issues: Vec<Issue>,
}

/// The composite result. `Unavailable` is returned instead of a number
/// whenever a critical collector failed, so a half-empty snapshot can
/// never masquerade as a healthy (or sick) network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HealthScore {
    Score { value: f64, grade: Grade },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub categories: Vec<HealthCategory>,
    pub overall: HealthScore,
}

/// Continuous 0-100 quality value for one client signal reading.
///
/// -90 dBm maps to 0 and -50 dBm to 100, linear in between.
pub fn client_quality(signal_dbm: i16) -> f64 {
    ((f64::from(signal_dbm) + 90.0) * 2.5).clamp(0.0, 100.0)
}

fn penalty_score(issues: &[Issue]) -> f64 {
    let total: f64 = issues.iter().map(|i| i.penalty).sum();
    (100.0 - total).max(0.0)
}

/// Mean quality over wireless clients that reported a signal. Wired
/// clients are excluded entirely rather than counted as perfect.
fn client_score(snapshot: &Snapshot) -> f64 {
    let readings: Vec<f64> = snapshot
        .clients
        .iter()
        .filter(|c| !c.wired)
        .filter_map(|c| c.signal_dbm)
        .map(client_quality)
        .collect();
    if readings.is_empty() {
        return 100.0;
    }
    readings.iter().sum::<f64>() / readings.len() as f64
}

/// Combine category scores into the weighted composite.
pub fn compute(
    snapshot: &Snapshot,
    weights: &CategoryWeights,
    rf_issues: Vec<Issue>,
    infra_issues: Vec<Issue>,
    security_issues: Vec<Issue>,
) -> ScoreReport {
    let categories = vec![
        HealthCategory {
            kind: CategoryKind::Rf,
            score: penalty_score(&rf_issues),
            weight: weights.rf,
            issues: rf_issues,
        },
        HealthCategory {
            kind: CategoryKind::Client,
            score: client_score(snapshot),
            weight: weights.client,
            issues: Vec::new(),
        },
        HealthCategory {
            kind: CategoryKind::Infrastructure,
            score: penalty_score(&infra_issues),
            weight: weights.infrastructure,
            issues: infra_issues,
        },
        HealthCategory {
            kind: CategoryKind::Security,
            score: penalty_score(&security_issues),
            weight: weights.security,
            issues: security_issues,
        },
    ];

    let overall = if snapshot.has_critical_failure() {
        let failed: Vec<String> = snapshot
            .failures
            .iter()
            .filter(|f| f.collector.is_critical())
            .map(|f| f.collector.to_string())
            .collect();
        HealthScore::Unavailable {
            reason: format!(
                "critical data collection failed ({}); score withheld",
                failed.join(", ")
            ),
        }
    } else {
        let value = categories
            .iter()
            .map(|c| c.score * c.weight)
            .sum::<f64>()
            .clamp(0.0, 100.0);
        HealthScore::Score {
            value,
            grade: Grade::from_score(value),
        }
    };

    ScoreReport { categories, overall }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::issue::{IssueKind, Severity};
    use crate::analysis::testutil::{client_on, snapshot_of};
    use crate::model::{CollectionFailure, Collector};

    fn issue(penalty: f64) -> Issue {
        Issue {
            severity: Severity::High,
            kind: IssueKind::BroadcastStorm,
            message: "x".into(),
            device: None,
            band: None,
            recommendation: None,
            penalty,
        }
    }

    #[test]
    fn quality_curve_endpoints_and_midpoint() {
        assert!((client_quality(-90) - 0.0).abs() < f64::EPSILON);
        assert!((client_quality(-50) - 100.0).abs() < f64::EPSILON);
        assert!((client_quality(-70) - 50.0).abs() < f64::EPSILON);
        // Clamped outside the range.
        assert!((client_quality(-100) - 0.0).abs() < f64::EPSILON);
        assert!((client_quality(-20) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn overall_is_bounded_even_under_huge_penalties() {
        let snap = snapshot_of(Vec::new());
        let report = compute(
            &snap,
            &CategoryWeights::default(),
            vec![issue(500.0)],
            vec![issue(500.0)],
            vec![issue(500.0)],
        );
        match report.overall {
            HealthScore::Score { value, .. } => {
                assert!((0.0..=100.0).contains(&value));
            }
            HealthScore::Unavailable { .. } => panic!("expected a numeric score"),
        }
        for category in &report.categories {
            assert!((0.0..=100.0).contains(&category.score));
        }
    }

    #[test]
    fn wired_clients_do_not_count_as_perfect() {
        let mut snap = snapshot_of(Vec::new());
        let mut wired = client_on("aa:00:00:00:00:01", -40);
        wired.wired = true;
        // One weak wireless client plus a wired one: the wired client
        // must not pull the mean up.
        snap.clients = vec![client_on("aa:00:00:00:00:01", -80), wired];
        let report = compute(&snap, &CategoryWeights::default(), vec![], vec![], vec![]);
        let client = report
            .categories
            .iter()
            .find(|c| c.kind == CategoryKind::Client)
            .unwrap();
        assert!((client.score - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn critical_collection_failure_withholds_the_score() {
        let mut snap = snapshot_of(Vec::new());
        snap.failures.push(CollectionFailure {
            collector: Collector::Devices,
            detail: "timeout".into(),
        });
        let report = compute(&snap, &CategoryWeights::default(), vec![], vec![], vec![]);
        match report.overall {
            HealthScore::Unavailable { reason } => assert!(reason.contains("devices")),
            HealthScore::Score { .. } => panic!("expected unavailable"),
        }
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(89.9), Grade::B);
        assert_eq!(Grade::from_score(80.0), Grade::B);
        assert_eq!(Grade::from_score(70.0), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::D);
        assert_eq!(Grade::from_score(59.9), Grade::F);
    }
}
