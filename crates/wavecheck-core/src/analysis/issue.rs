// ── Issue types shared by all analyzers ──

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::model::{Band, MacAddress};

/// Issue severity. Every issue at `Medium` or above carries a non-zero
/// score penalty and degrades the composite score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Machine-readable issue classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    // RF
    ChannelImbalance,
    NonStandardChannel,
    LowTxPower,
    ZeroTxPower,
    // Infrastructure
    BroadcastStorm,
    ChattyDevice,
    CyclicRestart,
    UnplannedRestart,
    IsolatedRestart,
    // Security
    FirmwareOutdated,
    // Data quality
    DataQuality,
}

/// Output of an analyzer: one observed problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub message: String,
    pub device: Option<MacAddress>,
    pub band: Option<Band>,
    /// Free-text remediation hint attached to the issue. Structured
    /// proposals go through the recommendation assembler instead.
    pub recommendation: Option<String>,
    /// Points subtracted from the owning category score.
    pub penalty: f64,
}

impl Issue {
    /// Sum of penalties across a set of issues.
    pub fn total_penalty(issues: &[Issue]) -> f64 {
        issues.iter().map(|i| i.penalty).sum()
    }
}
