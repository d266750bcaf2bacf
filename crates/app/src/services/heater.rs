//! The heater facade — typed operations over one device.
//!
//! A [`Heater`] binds a resolved [`ModelProfile`] to a connected
//! [`MiotClient`] and hides per-model identifier differences behind a
//! uniform interface. Every operation is validated against the profile
//! *before* any client call: an unsupported feature or out-of-range value
//! never reaches the network.

use std::sync::Mutex;

use miheater_domain::error::{
    CommunicationError, MiHeaterError, OutOfRangeError, UnsupportedFeatureError,
};
use miheater_domain::feature::Feature;
use miheater_domain::led::LedMode;
use miheater_domain::profile::ModelProfile;
use miheater_domain::property::{PropertySpec, PropertyValue};
use miheater_domain::status::HeaterStatus;
use miheater_domain::time;

use crate::ports::miot::MiotClient;

/// Per-device facade translating typed commands into property calls.
pub struct Heater<C> {
    profile: ModelProfile,
    client: C,
    /// Last fully-decoded snapshot. Only replaced after a successful
    /// read, so a failed poll never corrupts what callers can observe.
    cached: Mutex<Option<HeaterStatus>>,
}

impl<C: MiotClient> Heater<C> {
    /// Bind a resolved profile to a connected client.
    #[must_use]
    pub fn new(profile: ModelProfile, client: C) -> Self {
        Self {
            profile,
            client,
            cached: Mutex::new(None),
        }
    }

    /// The capability profile resolved at setup.
    #[must_use]
    pub fn profile(&self) -> &ModelProfile {
        &self.profile
    }

    /// The last successfully-read snapshot, if any.
    #[must_use]
    pub fn cached_status(&self) -> Option<HeaterStatus> {
        self.lock_cached().clone()
    }

    /// Read the device state: one batched property read covering every
    /// feature the profile supports, decoded into a [`HeaterStatus`].
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::Communication`] when the read fails or
    /// the device answers with the wrong shape; the previous cached
    /// snapshot stays untouched and visible via
    /// [`cached_status`](Self::cached_status).
    pub async fn status(&self) -> Result<HeaterStatus, MiHeaterError> {
        let features = self.profile.supported_features();
        let specs: Vec<PropertySpec> = features
            .iter()
            .filter_map(|feature| self.profile.property(*feature))
            .collect();

        let values = self.client.get_properties(&specs).await?;
        if values.len() != specs.len() {
            return Err(CommunicationError::ShortRead {
                expected: specs.len(),
                actual: values.len(),
            }
            .into());
        }

        let status = decode_status(&features, &values)?;
        tracing::debug!(model = %self.profile.model, power = status.power, "status read");

        *self.lock_cached() = Some(status.clone());
        Ok(status)
    }

    /// Turn the heater on or off.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::Communication`] when the write fails.
    pub async fn set_power(&self, on: bool) -> Result<(), MiHeaterError> {
        let spec = self.require(Feature::Power)?;
        self.write(spec, PropertyValue::Bool(on)).await
    }

    /// Set the target temperature.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::OutOfRange`] — before any client call —
    /// when `value` lies outside the profile's settable range, or
    /// [`MiHeaterError::Communication`] when the write fails.
    pub async fn set_target_temperature(&self, value: f64) -> Result<(), MiHeaterError> {
        if !self.profile.temperature_in_range(value) {
            return Err(OutOfRangeError {
                feature: Feature::TargetTemperature,
                value,
                min: self.profile.temp_min,
                max: self.profile.temp_max,
            }
            .into());
        }
        let spec = self.require(Feature::TargetTemperature)?;
        self.write(spec, PropertyValue::Float(value)).await
    }

    /// Enable or disable the command buzzer.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::UnsupportedFeature`] when the profile has
    /// no buzzer, or [`MiHeaterError::Communication`] when the write
    /// fails.
    pub async fn set_buzzer(&self, enabled: bool) -> Result<(), MiHeaterError> {
        let spec = self.require(Feature::Buzzer)?;
        self.write(spec, PropertyValue::Bool(enabled)).await
    }

    /// Engage or release the child lock.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::UnsupportedFeature`] when the profile has
    /// no child lock, or [`MiHeaterError::Communication`] when the write
    /// fails.
    pub async fn set_child_lock(&self, locked: bool) -> Result<(), MiHeaterError> {
        let spec = self.require(Feature::ChildLock)?;
        self.write(spec, PropertyValue::Bool(locked)).await
    }

    /// Set the LED brightness mode.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::UnsupportedFeature`] when the profile has
    /// no LED or does not offer `mode`, or
    /// [`MiHeaterError::Communication`] when the write fails.
    pub async fn set_led_mode(&self, mode: LedMode) -> Result<(), MiHeaterError> {
        let spec = self.require(Feature::LedBrightness)?;
        if !self.profile.supports_led_mode(mode) {
            return Err(UnsupportedFeatureError::LedMode {
                model: self.profile.model.clone(),
                mode,
            }
            .into());
        }
        self.write(spec, PropertyValue::Int(mode.wire_value())).await
    }

    /// Set the delay-off countdown, clamped into
    /// `[0, delay_off_max_secs]`. Returns the value actually written.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::UnsupportedFeature`] when the profile has
    /// no delay-off, or [`MiHeaterError::Communication`] when the write
    /// fails.
    pub async fn set_delay_off(&self, secs: u32) -> Result<u32, MiHeaterError> {
        let spec = self.require(Feature::DelayOff)?;
        let clamped = self.profile.clamp_delay_off(secs);
        self.write(spec, PropertyValue::Int(i64::from(clamped)))
            .await?;
        Ok(clamped)
    }

    fn require(&self, feature: Feature) -> Result<PropertySpec, MiHeaterError> {
        self.profile.property(feature).ok_or_else(|| {
            UnsupportedFeatureError::Feature {
                model: self.profile.model.clone(),
                feature,
            }
            .into()
        })
    }

    async fn write(&self, spec: PropertySpec, value: PropertyValue) -> Result<(), MiHeaterError> {
        tracing::debug!(model = %self.profile.model, property = %spec, ?value, "property write");
        self.client.set_property(spec, value).await?;
        Ok(())
    }

    fn lock_cached(&self) -> std::sync::MutexGuard<'_, Option<HeaterStatus>> {
        self.cached
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn decode_status(
    features: &[Feature],
    values: &[PropertyValue],
) -> Result<HeaterStatus, MiHeaterError> {
    let mut status = HeaterStatus {
        power: false,
        temperature: 0.0,
        target_temperature: 0.0,
        humidity: None,
        buzzer: None,
        child_lock: None,
        led_mode: None,
        delay_off_secs: None,
        read_at: time::now(),
    };

    for (feature, value) in features.iter().zip(values) {
        let unexpected = || CommunicationError::UnexpectedType { feature: *feature };
        match feature {
            Feature::Power => status.power = value.as_bool().ok_or_else(unexpected)?,
            Feature::Temperature => {
                status.temperature = value.as_f64().ok_or_else(unexpected)?;
            }
            Feature::TargetTemperature => {
                status.target_temperature = value.as_f64().ok_or_else(unexpected)?;
            }
            Feature::RelativeHumidity => {
                status.humidity = Some(value.as_f64().ok_or_else(unexpected)?);
            }
            Feature::Buzzer => status.buzzer = Some(value.as_bool().ok_or_else(unexpected)?),
            Feature::ChildLock => {
                status.child_lock = Some(value.as_bool().ok_or_else(unexpected)?);
            }
            Feature::LedBrightness => {
                let raw = value.as_i64().ok_or_else(unexpected)?;
                status.led_mode = Some(LedMode::from_wire(raw).ok_or_else(unexpected)?);
            }
            Feature::DelayOff => {
                let raw = value.as_i64().ok_or_else(unexpected)?;
                status.delay_off_secs = Some(u32::try_from(raw).map_err(|_| unexpected())?);
            }
        }
    }

    Ok(status)
}
