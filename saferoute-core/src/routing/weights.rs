//! Per-request weight vector derived from user preferences and time of day

use chrono::Timelike;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::WeightConfig;

pub const MIN_PREFERENCE: u8 = 1;
pub const MAX_PREFERENCE: u8 = 5;

/// User safety sensitivities, each in `[1, 5]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Preference for surveilled streets
    pub cctv: u8,
    /// Aversion to low-visibility streets
    pub blind: u8,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { cctv: 3, blind: 3 }
    }
}

impl Preferences {
    /// Brings both sensitivities into the supported range
    pub fn clamped(self) -> Self {
        let clamped = Self {
            cctv: self.cctv.clamp(MIN_PREFERENCE, MAX_PREFERENCE),
            blind: self.blind.clamp(MIN_PREFERENCE, MAX_PREFERENCE),
        };
        if clamped != self {
            warn!("Preferences {self:?} out of range, using {clamped:?}");
        }
        clamped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Trade distance for lighting, surveillance and visibility
    #[default]
    Safe,
    /// Pure physical length
    Fast,
}

/// Relative importance of lighting, surveillance and blind-spot avoidance
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightVector {
    pub light: f64,
    pub cctv: f64,
    pub blind: f64,
}

impl WeightVector {
    pub const ZERO: Self = Self {
        light: 0.0,
        cctv: 0.0,
        blind: 0.0,
    };

    pub fn new(light: f64, cctv: f64, blind: f64) -> Self {
        Self { light, cctv, blind }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Daytime is `[day_start_hour, day_end_hour]`, both ends inclusive
pub fn is_daytime(hour: u32, config: &WeightConfig) -> bool {
    (config.day_start_hour..=config.day_end_hour).contains(&hour)
}

/// Local hour of day, 0-23
pub fn current_hour() -> u32 {
    chrono::Local::now().hour()
}

/// Builds the weight vector for one route request.
///
/// Lighting matters little during the day and a lot at night. Fast mode
/// zeroes every weight so cost degenerates to segment length.
pub fn compute_weights(
    preferences: Preferences,
    hour: u32,
    mode: RouteMode,
    config: &WeightConfig,
) -> WeightVector {
    if mode == RouteMode::Fast {
        return WeightVector::ZERO;
    }

    let preferences = preferences.clamped();
    let time_factor = if is_daytime(hour, config) {
        config.day_light_factor
    } else {
        config.night_light_factor
    };

    WeightVector {
        light: config.base_light * time_factor,
        cctv: f64::from(preferences.cctv) * config.cctv_coefficient,
        blind: f64::from(preferences.blind) * config.blind_coefficient,
    }
}
