//! Tunable constants of the safety model.
//!
//! Two parameterizations of the weight formula exist in the field data this
//! crate was calibrated against. [`SafetyConfig::default`] is the primary one,
//! [`SafetyConfig::alternate`] the divergent variant. Neither is canonical, so
//! every coefficient is a plain field that can be overridden from TOML.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SafetyConfig {
    pub weights: WeightConfig,
    pub cost: CostConfig,
    pub blind_score: BlindScoreConfig,
    pub defaults: FeatureDefaults,
    pub ingest: IngestConfig,
    pub overlay: OverlayConfig,
    pub fallback: FallbackConfig,
}

impl SafetyConfig {
    /// The second coefficient set: weaker daytime lighting weight, a lower
    /// blind-spot coefficient and a unit base lighting weight.
    pub fn alternate() -> Self {
        Self {
            weights: WeightConfig {
                base_light: 1.0,
                day_light_factor: 0.1,
                night_light_factor: 2.5,
                cctv_coefficient: 1.5,
                blind_coefficient: 1.2,
                ..WeightConfig::default()
            },
            ..Self::default()
        }
    }
}

/// Coefficients turning user preferences and the hour of day into a weight vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub base_light: f64,
    pub day_light_factor: f64,
    pub night_light_factor: f64,
    pub cctv_coefficient: f64,
    pub blind_coefficient: f64,
    /// First daytime hour, inclusive
    pub day_start_hour: u32,
    /// Last daytime hour, inclusive
    pub day_end_hour: u32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            base_light: 3.0,
            day_light_factor: 0.2,
            night_light_factor: 2.5,
            cctv_coefficient: 1.5,
            blind_coefficient: 2.0,
            day_start_hour: 8,
            day_end_hour: 18,
        }
    }
}

/// Multipliers of the edge cost formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub cctv_factor: f64,
    pub light_factor: f64,
    pub blind_factor: f64,
    /// Lower bound of every edge cost. Must be positive.
    pub min_cost: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            cctv_factor: 5.0,
            light_factor: 2.0,
            blind_factor: 10.0,
            min_cost: 1.0,
        }
    }
}

/// Rules for deriving a blind score when the feed does not carry one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlindScoreConfig {
    pub no_cctv_penalty: f64,
    pub no_light_penalty: f64,
    pub narrow_penalty: f64,
    /// Roads strictly narrower than this are penalized
    pub narrow_width: f64,
    /// Roads at least this wide always score zero
    pub wide_width: f64,
}

impl Default for BlindScoreConfig {
    fn default() -> Self {
        Self {
            no_cctv_penalty: 20.0,
            no_light_penalty: 10.0,
            narrow_penalty: 20.0,
            narrow_width: 4.0,
            wide_width: 12.0,
        }
    }
}

/// Values substituted for missing feature attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureDefaults {
    pub length: f64,
    pub width: f64,
}

impl Default for FeatureDefaults {
    fn default() -> Self {
        Self {
            length: 100.0,
            width: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IngestConfig {
    /// Reject features without explicit endpoint identifiers instead of
    /// synthesizing feature-scoped ones
    pub require_node_ids: bool,
}

/// Display classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub high_threshold: f64,
    pub medium_threshold: f64,
    pub dark_factor: f64,
    pub blind_factor: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            high_threshold: 15.0,
            medium_threshold: 5.0,
            dark_factor: 5.0,
            blind_factor: 5.0,
        }
    }
}

/// Parameters of the synthetic walking itinerary used when the transit
/// provider is unavailable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub walking_speed_mps: f64,
    pub min_minutes: u32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            walking_speed_mps: 1.2,
            min_minutes: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_like_json_keeps_defaults() {
        let config: SafetyConfig =
            serde_json::from_str(r#"{"weights": {"night_light_factor": 4.0}}"#).unwrap();
        assert_eq!(config.weights.night_light_factor, 4.0);
        assert_eq!(config.weights.base_light, 3.0);
        assert_eq!(config.cost, CostConfig::default());
    }

    #[test]
    fn alternate_preset_differs_only_in_weights() {
        let alternate = SafetyConfig::alternate();
        assert_eq!(alternate.weights.day_light_factor, 0.1);
        assert_eq!(alternate.weights.blind_coefficient, 1.2);
        assert_eq!(alternate.cost, SafetyConfig::default().cost);
    }
}
