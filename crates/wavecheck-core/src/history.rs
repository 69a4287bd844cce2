// ── Recommendation history & suppression ──
//
// The only stateful component. Every accepted setting-change
// recommendation is recorded under its `device|band|kind` key so later
// runs can suppress repeats (same value inside the suppression window) and
// give applied changes time to settle before re-flagging. The store is
// a single JSON file, read once per run and written back atomically.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::assemble::Recommendation;
use crate::config::HistoryConfig;
use crate::error::CoreError;

/// Last accepted recommendation for one `device|band|kind` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Proposed value as recorded (channel number, threshold, mode).
    pub value: String,
    pub recorded_at: DateTime<Utc>,
    pub reason: String,
}

/// Why a recommendation was withheld this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SuppressReason {
    /// The same value was already recommended within the suppression
    /// window.
    RepeatedRecently { days_ago: i64 },
    /// The configured value matches the last recommendation and that
    /// change is still inside the settle window.
    Settling { days_ago: i64 },
}

/// A recommendation withheld by the tracker, kept for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suppressed {
    pub recommendation: Recommendation,
    pub reason: SuppressReason,
}

/// Result of running the full recommendation list through the tracker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOutcome {
    pub accepted: Vec<Recommendation>,
    pub suppressed: Vec<Suppressed>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    entries: BTreeMap<String, HistoryEntry>,
}

/// Durable per-key recommendation history.
#[derive(Debug)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, HistoryEntry>,
}

impl HistoryStore {
    /// A store with no backing file. Used in tests and for one-shot
    /// runs that explicitly opt out of persistence.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: BTreeMap::new(),
        }
    }

    /// Load the store from disk. A missing file is a fresh store; an
    /// unreadable or corrupt file degrades to an empty store so the run
    /// proceeds with suppression disabled rather than aborting.
    pub fn load(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<StoreFile>(&raw) {
                Ok(file) => file.entries,
                Err(err) => {
                    warn!(path = %path.display(), %err, "history store corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(path = %path.display(), %err, "history store unreadable, starting empty");
                BTreeMap::new()
            }
        };
        Self {
            path: Some(path.to_path_buf()),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&HistoryEntry> {
        self.entries.get(key)
    }

    /// Run recommendations through suppression and record the accepted
    /// ones. Must be called once per run, after all analyzers: the
    /// read-modify-write per key happens inside this single pass.
    pub fn filter(
        &mut self,
        recommendations: Vec<Recommendation>,
        config: &HistoryConfig,
        now: DateTime<Utc>,
    ) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for rec in recommendations {
            let Some(key) = rec.dedup_key() else {
                // Investigations and other keyless entries always pass.
                outcome.accepted.push(rec);
                continue;
            };

            if let Some(entry) = self.entries.get(&key) {
                let age_days = (now - entry.recorded_at).num_days();

                if rec.proposed.as_deref() == Some(entry.value.as_str())
                    && age_days < config.suppression_days
                {
                    debug!(%key, age_days, "suppressing repeat recommendation");
                    outcome.suppressed.push(Suppressed {
                        recommendation: rec,
                        reason: SuppressReason::RepeatedRecently { days_ago: age_days },
                    });
                    continue;
                }

                if rec.current.as_deref() == Some(entry.value.as_str())
                    && age_days < config.settle_days
                {
                    debug!(%key, age_days, "change still settling");
                    outcome.suppressed.push(Suppressed {
                        recommendation: rec,
                        reason: SuppressReason::Settling { days_ago: age_days },
                    });
                    continue;
                }
            }

            if let Some(value) = rec.proposed.clone() {
                self.entries.insert(
                    key,
                    HistoryEntry {
                        value,
                        recorded_at: now,
                        reason: rec.reason.clone(),
                    },
                );
            }
            outcome.accepted.push(rec);
        }

        outcome
    }

    /// Drop entries older than the retention window. Returns how many
    /// were removed.
    pub fn prune(&mut self, retention_days: i64, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(retention_days);
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.recorded_at >= cutoff);
        before - self.entries.len()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HistoryEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Write the store back to disk via a temp file and rename, so a
    /// crash mid-write never leaves a truncated store behind.
    pub fn save(&self) -> Result<(), CoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = StoreFile {
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|err| {
            CoreError::HistoryWriteFailed {
                path: path.display().to_string(),
                reason: format!("serialize failed: {err}"),
            }
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| CoreError::HistoryWriteFailed {
                path: path.display().to_string(),
                reason: format!("creating {}: {err}", parent.display()),
            })?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|err| CoreError::HistoryWriteFailed {
            path: path.display().to_string(),
            reason: format!("writing temp file: {err}"),
        })?;
        fs::rename(&tmp, path).map_err(|err| CoreError::HistoryWriteFailed {
            path: path.display().to_string(),
            reason: format!("rename failed: {err}"),
        })?;
        Ok(())
    }
}
