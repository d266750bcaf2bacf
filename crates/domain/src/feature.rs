//! Logical heater features, independent of any model's MiOT identifiers.
//!
//! A [`ModelProfile`](crate::profile::ModelProfile) maps each feature it
//! supports to the MiOT property address used to read or write it.

use serde::{Deserialize, Serialize};

/// A logical, model-independent heater feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Main power switch.
    Power,
    /// Ambient temperature reading.
    Temperature,
    /// Settable target temperature.
    TargetTemperature,
    /// Relative humidity reading.
    RelativeHumidity,
    /// Audible feedback on commands.
    Buzzer,
    /// Physical control lock.
    ChildLock,
    /// Display/indicator brightness.
    LedBrightness,
    /// Automatic power-off countdown.
    DelayOff,
}

impl Feature {
    /// Features every heater model must map: the facade cannot operate
    /// without power control and the two temperatures.
    pub const MANDATORY: [Self; 3] = [Self::Power, Self::Temperature, Self::TargetTemperature];

    /// Features whose presence varies per model.
    pub const OPTIONAL: [Self; 5] = [
        Self::RelativeHumidity,
        Self::Buzzer,
        Self::ChildLock,
        Self::LedBrightness,
        Self::DelayOff,
    ];
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Power => "power",
            Self::Temperature => "temperature",
            Self::TargetTemperature => "target_temperature",
            Self::RelativeHumidity => "relative_humidity",
            Self::Buzzer => "buzzer",
            Self::ChildLock => "child_lock",
            Self::LedBrightness => "led_brightness",
            Self::DelayOff => "delay_off",
        };
        f.write_str(name)
    }
}
