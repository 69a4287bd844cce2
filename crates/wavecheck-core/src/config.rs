// ── Engine configuration ──
//
// Every tunable threshold the analyzers use, loaded once at process
// start into an immutable value and passed into each analyzer call.
// Core never reads config files; the CLI builds this struct (or takes
// the defaults) and hands it in.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::Band;

/// Fixed weights combining category scores into the overall score.
/// Must sum to 1.0 ([`EngineConfig::validate`] enforces this).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub rf: f64,
    pub client: f64,
    pub infrastructure: f64,
    pub security: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            rf: 0.35,
            client: 0.30,
            infrastructure: 0.20,
            security: 0.15,
        }
    }
}

impl CategoryWeights {
    pub fn sum(&self) -> f64 {
        self.rf + self.client + self.infrastructure + self.security
    }
}

/// Minimum-RSSI thresholds per band, in dBm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandThresholds {
    pub ghz2: i16,
    pub ghz5: i16,
    pub ghz6: i16,
}

impl BandThresholds {
    pub fn for_band(&self, band: Band) -> i16 {
        match band {
            Band::Ghz2 => self.ghz2,
            Band::Ghz5 => self.ghz5,
            Band::Ghz6 => self.ghz6,
        }
    }
}

/// Threshold profiles selected by client-population mix.
///
/// 6 GHz is always kept gentler than 5 GHz — 6 GHz propagates worse,
/// so an equal threshold would shed clients earlier than intended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssiProfiles {
    pub standard: BandThresholds,
    pub ios_friendly: BandThresholds,
    /// iOS share of the wireless population at or above which the
    /// iOS-friendly profile is selected.
    pub ios_share_cutoff: f64,
}

impl Default for RssiProfiles {
    fn default() -> Self {
        Self {
            standard: BandThresholds {
                ghz2: -75,
                ghz5: -72,
                ghz6: -70,
            },
            ios_friendly: BandThresholds {
                ghz2: -78,
                ghz5: -75,
                ghz6: -72,
            },
            ios_share_cutoff: 0.20,
        }
    }
}

/// Device stability classification tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityConfig {
    /// Look-back window for event correlation, in days.
    pub event_window_days: i64,
    /// Restart count at which a device is classified cyclic.
    pub cyclic_restart_count: usize,
    /// Estimated daily restart rate at which a device is classified
    /// cyclic (estimation path).
    pub cyclic_daily_rate: f64,
    /// Log span beyond which the daily rate is estimated rather than
    /// the raw count trusted, in days.
    pub stale_span_days: f64,
    /// Uptime below which the estimation path applies, in hours.
    pub estimation_uptime_hours: i64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            event_window_days: 7,
            cyclic_restart_count: 3,
            cyclic_daily_rate: 2.0,
            stale_span_days: 14.0,
            estimation_uptime_hours: 48,
        }
    }
}

/// Broadcast/multicast storm detection tunables. Rates are packets/hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StormConfig {
    /// Absolute floor below which a port is never flagged as a storm.
    pub storm_floor: f64,
    /// Multiple of the per-switch port average a storm must exceed.
    pub storm_avg_multiplier: f64,
    /// Floor for the softer "chatty device" tier.
    pub chatty_floor: f64,
    /// Average multiple for the chatty tier.
    pub chatty_avg_multiplier: f64,
}

impl Default for StormConfig {
    fn default() -> Self {
        Self {
            storm_floor: 10_000.0,
            storm_avg_multiplier: 3.0,
            chatty_floor: 5_000.0,
            chatty_avg_multiplier: 2.0,
        }
    }
}

/// Recommendation-history windows, in days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Identical proposals within this window are suppressed.
    pub suppression_days: i64,
    /// A change matching the last recommendation is left alone for this
    /// long before being re-flagged.
    pub settle_days: i64,
    /// Entries older than this are purged.
    pub retention_days: i64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            suppression_days: 30,
            settle_days: 7,
            retention_days: 90,
        }
    }
}

/// Immutable engine configuration, passed into every analyzer call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: CategoryWeights,
    pub rssi: RssiProfiles,
    pub stability: StabilityConfig,
    pub storm: StormConfig,
    pub history: HistoryConfig,
}

impl EngineConfig {
    /// Validate cross-field invariants.
    pub fn validate(&self) -> Result<(), CoreError> {
        if (self.weights.sum() - 1.0).abs() > 1e-6 {
            return Err(CoreError::InvalidConfig {
                message: format!("category weights must sum to 1.0, got {}", self.weights.sum()),
            });
        }
        for (profile, t) in [
            ("standard", &self.rssi.standard),
            ("ios_friendly", &self.rssi.ios_friendly),
        ] {
            if t.ghz6 <= t.ghz5 {
                return Err(CoreError::InvalidConfig {
                    message: format!(
                        "{profile}: 6 GHz threshold ({}) must be gentler than 5 GHz ({})",
                        t.ghz6, t.ghz5
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        EngineConfig::default().validate().expect("defaults valid");
    }

    #[test]
    fn unbalanced_weights_rejected() {
        let config = EngineConfig {
            weights: CategoryWeights {
                rf: 0.5,
                client: 0.5,
                infrastructure: 0.5,
                security: 0.5,
            },
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn six_ghz_must_be_gentler_than_five() {
        let mut config = EngineConfig::default();
        config.rssi.standard.ghz6 = config.rssi.standard.ghz5;
        assert!(config.validate().is_err());
    }
}
