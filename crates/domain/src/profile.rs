//! Model capability profiles.
//!
//! A [`ModelProfile`] is the immutable record of what one physical heater
//! model can do and which MiOT property address serves each feature. The
//! facade consults the active profile before every operation: a feature
//! absent from the profile is never exposed and never written to.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{MiHeaterError, ValidationError};
use crate::feature::Feature;
use crate::led::LedMode;
use crate::property::PropertySpec;

/// Capabilities and property addresses of one heater model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Exact model string as reported by the device (e.g. `zhimi.heater.za2`).
    pub model: String,
    /// Lowest settable target temperature, °C.
    pub temp_min: f64,
    /// Highest settable target temperature, °C.
    pub temp_max: f64,
    pub supports_buzzer: bool,
    pub supports_child_lock: bool,
    pub supports_led: bool,
    /// Brightness levels this model's LED accepts.
    pub led_modes: BTreeSet<LedMode>,
    pub supports_delay_off: bool,
    /// Upper bound for the delay-off countdown, seconds.
    pub delay_off_max_secs: u32,
    pub supports_humidity: bool,
    /// Feature → MiOT property address. Unsupported features are absent,
    /// never mapped to a placeholder address.
    pub properties: BTreeMap<Feature, PropertySpec>,
}

impl ModelProfile {
    /// Create a builder for constructing a [`ModelProfile`].
    #[must_use]
    pub fn builder() -> ModelProfileBuilder {
        ModelProfileBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::Validation`] when the model string is
    /// empty, the temperature range is not strictly increasing, a flagged
    /// or mandatory feature lacks a property mapping, LED support comes
    /// with an empty mode set, or delay-off support comes with a zero
    /// maximum.
    pub fn validate(&self) -> Result<(), MiHeaterError> {
        if self.model.is_empty() {
            return Err(ValidationError::EmptyModel.into());
        }
        if self.temp_min >= self.temp_max {
            return Err(ValidationError::TemperatureRange {
                min: self.temp_min,
                max: self.temp_max,
            }
            .into());
        }
        for feature in Feature::MANDATORY {
            if !self.properties.contains_key(&feature) {
                return Err(ValidationError::UnmappedFeature { feature }.into());
            }
        }
        for feature in Feature::OPTIONAL {
            if self.flag(feature) && !self.properties.contains_key(&feature) {
                return Err(ValidationError::UnmappedFeature { feature }.into());
            }
        }
        if self.supports_led && self.led_modes.is_empty() {
            return Err(ValidationError::EmptyLedModes.into());
        }
        if self.supports_delay_off && self.delay_off_max_secs == 0 {
            return Err(ValidationError::ZeroDelayOffMax.into());
        }
        Ok(())
    }

    /// Whether this model supports `feature`. Mandatory features are
    /// supported by every valid profile; optional features require both
    /// the flag and a property mapping.
    #[must_use]
    pub fn supports(&self, feature: Feature) -> bool {
        self.flag(feature) && self.properties.contains_key(&feature)
    }

    /// Property address for `feature`, or `None` when unsupported.
    #[must_use]
    pub fn property(&self, feature: Feature) -> Option<PropertySpec> {
        if self.supports(feature) {
            self.properties.get(&feature).copied()
        } else {
            None
        }
    }

    /// All supported features in a fixed, deterministic order (mandatory
    /// first). The facade uses this order for its batched read.
    #[must_use]
    pub fn supported_features(&self) -> Vec<Feature> {
        Feature::MANDATORY
            .into_iter()
            .chain(Feature::OPTIONAL)
            .filter(|feature| self.supports(*feature))
            .collect()
    }

    /// Whether `mode` is an accepted LED brightness level on this model.
    #[must_use]
    pub fn supports_led_mode(&self, mode: LedMode) -> bool {
        self.supports_led && self.led_modes.contains(&mode)
    }

    /// Whether `value` is a settable target temperature on this model.
    #[must_use]
    pub fn temperature_in_range(&self, value: f64) -> bool {
        value >= self.temp_min && value <= self.temp_max
    }

    /// Clamp a delay-off request into `[0, delay_off_max_secs]`.
    #[must_use]
    pub fn clamp_delay_off(&self, secs: u32) -> u32 {
        secs.min(self.delay_off_max_secs)
    }

    fn flag(&self, feature: Feature) -> bool {
        match feature {
            Feature::Power | Feature::Temperature | Feature::TargetTemperature => true,
            Feature::RelativeHumidity => self.supports_humidity,
            Feature::Buzzer => self.supports_buzzer,
            Feature::ChildLock => self.supports_child_lock,
            Feature::LedBrightness => self.supports_led,
            Feature::DelayOff => self.supports_delay_off,
        }
    }
}

/// Step-by-step builder for [`ModelProfile`].
///
/// Declaring an optional feature takes both the property address and any
/// feature-specific data, so a flag can never end up without a mapping.
#[derive(Debug, Default)]
pub struct ModelProfileBuilder {
    model: Option<String>,
    temp_min: f64,
    temp_max: f64,
    supports_buzzer: bool,
    supports_child_lock: bool,
    supports_led: bool,
    led_modes: BTreeSet<LedMode>,
    supports_delay_off: bool,
    delay_off_max_secs: u32,
    supports_humidity: bool,
    properties: BTreeMap<Feature, PropertySpec>,
}

impl ModelProfileBuilder {
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn temperature_range(mut self, min: f64, max: f64) -> Self {
        self.temp_min = min;
        self.temp_max = max;
        self
    }

    #[must_use]
    pub fn power(mut self, spec: PropertySpec) -> Self {
        self.properties.insert(Feature::Power, spec);
        self
    }

    #[must_use]
    pub fn temperature(mut self, spec: PropertySpec) -> Self {
        self.properties.insert(Feature::Temperature, spec);
        self
    }

    #[must_use]
    pub fn target_temperature(mut self, spec: PropertySpec) -> Self {
        self.properties.insert(Feature::TargetTemperature, spec);
        self
    }

    #[must_use]
    pub fn humidity(mut self, spec: PropertySpec) -> Self {
        self.supports_humidity = true;
        self.properties.insert(Feature::RelativeHumidity, spec);
        self
    }

    #[must_use]
    pub fn buzzer(mut self, spec: PropertySpec) -> Self {
        self.supports_buzzer = true;
        self.properties.insert(Feature::Buzzer, spec);
        self
    }

    #[must_use]
    pub fn child_lock(mut self, spec: PropertySpec) -> Self {
        self.supports_child_lock = true;
        self.properties.insert(Feature::ChildLock, spec);
        self
    }

    #[must_use]
    pub fn led(mut self, spec: PropertySpec, modes: impl IntoIterator<Item = LedMode>) -> Self {
        self.supports_led = true;
        self.led_modes = modes.into_iter().collect();
        self.properties.insert(Feature::LedBrightness, spec);
        self
    }

    #[must_use]
    pub fn delay_off(mut self, spec: PropertySpec, max_secs: u32) -> Self {
        self.supports_delay_off = true;
        self.delay_off_max_secs = max_secs;
        self.properties.insert(Feature::DelayOff, spec);
        self
    }

    /// Consume the builder, validate, and return a [`ModelProfile`].
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::Validation`] when any profile invariant
    /// fails; see [`ModelProfile::validate`].
    pub fn build(self) -> Result<ModelProfile, MiHeaterError> {
        let profile = ModelProfile {
            model: self.model.unwrap_or_default(),
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            supports_buzzer: self.supports_buzzer,
            supports_child_lock: self.supports_child_lock,
            supports_led: self.supports_led,
            led_modes: self.led_modes,
            supports_delay_off: self.supports_delay_off,
            delay_off_max_secs: self.delay_off_max_secs,
            supports_humidity: self.supports_humidity,
            properties: self.properties,
        };
        profile.validate()?;
        Ok(profile)
    }
}
