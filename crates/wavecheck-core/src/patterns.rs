// ── Device-pattern lookup table ──
//
// File-backed heuristics for classifying clients by OS family from
// hostname and OUI strings. The table is versioned and shipped outside
// the binary so signatures can be updated without a release. Loaded
// once at startup into an immutable value; a missing or malformed file
// yields empty pattern sets (reduced precision), never a fatal error.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::warn;

/// Client operating-system family.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    #[strum(serialize = "iOS")]
    Ios,
    Android,
    Windows,
    #[strum(serialize = "macOS")]
    Macos,
    Linux,
    #[strum(serialize = "IoT")]
    Iot,
    Unknown,
}

/// One pattern set: substrings that map a client to an OS family.
/// Matching is case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsPattern {
    pub family: OsFamily,
    #[serde(default)]
    pub hostname: Vec<String>,
    #[serde(default)]
    pub oui: Vec<String>,
}

/// Immutable pattern table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternTable {
    #[serde(default, rename = "os")]
    pub os_patterns: Vec<OsPattern>,
}

impl PatternTable {
    /// An empty table: every client classifies as `Unknown`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table from a TOML file.
    ///
    /// Any failure — missing file, unreadable, malformed TOML — falls
    /// back to the empty table with a warning. Analysis proceeds with
    /// reduced precision rather than failing.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "pattern table unavailable, using empty table");
                return Self::empty();
            }
        };
        match toml::from_str(&raw) {
            Ok(table) => table,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "pattern table malformed, using empty table");
                Self::empty()
            }
        }
    }

    /// Classify a client by hostname and OUI heuristics.
    pub fn classify(&self, hostname: Option<&str>, oui: Option<&str>) -> OsFamily {
        let hostname = hostname.map(str::to_lowercase);
        let oui = oui.map(str::to_lowercase);

        for pattern in &self.os_patterns {
            if let Some(ref h) = hostname {
                if pattern.hostname.iter().any(|kw| h.contains(&kw.to_lowercase())) {
                    return pattern.family;
                }
            }
            if let Some(ref o) = oui {
                if pattern.oui.iter().any(|kw| o.contains(&kw.to_lowercase())) {
                    return pattern.family;
                }
            }
        }
        OsFamily::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> PatternTable {
        toml::from_str(
            r#"
            [[os]]
            family = "ios"
            hostname = ["iphone", "ipad"]
            oui = ["apple"]

            [[os]]
            family = "android"
            hostname = ["android", "pixel", "galaxy"]
            "#,
        )
        .expect("sample table")
    }

    #[test]
    fn classifies_by_hostname() {
        let table = sample_table();
        assert_eq!(table.classify(Some("Staff-iPhone-12"), None), OsFamily::Ios);
        assert_eq!(table.classify(Some("pixel-7a"), None), OsFamily::Android);
    }

    #[test]
    fn classifies_by_oui_fallback() {
        let table = sample_table();
        assert_eq!(
            table.classify(None, Some("Apple, Inc.")),
            OsFamily::Ios
        );
    }

    #[test]
    fn unknown_without_match() {
        let table = sample_table();
        assert_eq!(table.classify(Some("desktop-3f"), None), OsFamily::Unknown);
    }

    #[test]
    fn missing_file_yields_empty_table() {
        let table = PatternTable::load(Path::new("/nonexistent/patterns.toml"));
        assert!(table.os_patterns.is_empty());
        assert_eq!(table.classify(Some("iphone"), None), OsFamily::Unknown);
    }
}
