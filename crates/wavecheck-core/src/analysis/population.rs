// ── Client population profiling & threshold selection ──
//
// The right minimum-RSSI threshold depends on who is on the network:
// iOS devices roam conservatively and drop earlier at aggressive
// thresholds, so a population with a meaningful iOS share gets gentler
// values. WiFi-generation mix additionally informs band steering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::config::{BandThresholds, RssiProfiles};
use crate::model::{Band, Client};
use crate::patterns::{OsFamily, PatternTable};

/// WiFi generation derived from the negotiated protocol string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum WifiGeneration {
    #[strum(serialize = "WiFi 4")]
    Wifi4,
    #[strum(serialize = "WiFi 5")]
    Wifi5,
    #[strum(serialize = "WiFi 6")]
    Wifi6,
    #[strum(serialize = "WiFi 6E")]
    Wifi6e,
    #[strum(serialize = "WiFi 7")]
    Wifi7,
    Unknown,
}

impl WifiGeneration {
    /// 5 GHz capable (WiFi 5 and newer) — the band-steering audience.
    pub fn is_dual_band_capable(self) -> bool {
        matches!(
            self,
            Self::Wifi5 | Self::Wifi6 | Self::Wifi6e | Self::Wifi7
        )
    }
}

/// Classify the WiFi generation from the protocol token and band.
///
/// "ax" on 6 GHz is 6E — same protocol, different certification tier.
pub fn wifi_generation(protocol: Option<&str>, band: Option<Band>) -> WifiGeneration {
    match protocol {
        Some("be") => WifiGeneration::Wifi7,
        Some("ax") if band == Some(Band::Ghz6) => WifiGeneration::Wifi6e,
        Some("ax") => WifiGeneration::Wifi6,
        Some("ac") => WifiGeneration::Wifi5,
        Some("ng" | "n") => WifiGeneration::Wifi4,
        _ => WifiGeneration::Unknown,
    }
}

/// Which threshold profile was selected and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    Standard,
    IosFriendly,
}

/// Aggregate population profile plus the selected thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationProfile {
    pub total_wireless: usize,
    pub os_mix: BTreeMap<OsFamily, usize>,
    pub generation_mix: BTreeMap<WifiGeneration, usize>,
    /// Fraction of wireless clients classified as iOS (0.0–1.0).
    pub ios_share: f64,
    pub threshold_mode: ThresholdMode,
    /// Minimum-RSSI thresholds selected for this population.
    pub thresholds: BandThresholds,
}

impl PopulationProfile {
    /// Number of clients that can use 5 GHz or better.
    pub fn dual_band_capable(&self) -> usize {
        self.generation_mix
            .iter()
            .filter(|(g, _)| g.is_dual_band_capable())
            .map(|(_, n)| n)
            .sum()
    }
}

/// Profile the wireless client population and select thresholds.
pub fn profile(
    clients: &[Client],
    patterns: &PatternTable,
    profiles: &RssiProfiles,
) -> PopulationProfile {
    let wireless: Vec<&Client> = clients.iter().filter(|c| !c.wired).collect();

    let mut os_mix: BTreeMap<OsFamily, usize> = BTreeMap::new();
    let mut generation_mix: BTreeMap<WifiGeneration, usize> = BTreeMap::new();

    for client in &wireless {
        let family = patterns.classify(client.hostname.as_deref(), client.oui.as_deref());
        *os_mix.entry(family).or_insert(0) += 1;

        let generation = wifi_generation(client.protocol.as_deref(), client.band);
        *generation_mix.entry(generation).or_insert(0) += 1;
    }

    let ios_count = os_mix.get(&OsFamily::Ios).copied().unwrap_or(0);
    let ios_share = if wireless.is_empty() {
        0.0
    } else {
        ios_count as f64 / wireless.len() as f64
    };

    let (threshold_mode, thresholds) = if ios_share >= profiles.ios_share_cutoff {
        (ThresholdMode::IosFriendly, profiles.ios_friendly)
    } else {
        (ThresholdMode::Standard, profiles.standard)
    };

    PopulationProfile {
        total_wireless: wireless.len(),
        os_mix,
        generation_mix,
        ios_share,
        threshold_mode,
        thresholds,
    }
}
