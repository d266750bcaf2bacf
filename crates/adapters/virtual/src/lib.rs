//! # miheater-adapter-virtual
//!
//! Simulated heater implementing the [`MiotClient`] port for tests and
//! demo runs: an in-memory property table seeded from a capability
//! profile, with failure injection for communication-error paths.
//!
//! The simulated device behaves like the real protocol surface: reads
//! and writes are addressed by (siid, piid), a property outside the
//! seeded table fails the whole request, and an injected outage fails
//! every call until cleared.
//!
//! ## Dependency rule
//!
//! Depends on `miheater-app` (port traits) and `miheater-domain` only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use miheater_app::ports::miot::{DeviceInfo, MiotClient};
use miheater_domain::error::CommunicationError;
use miheater_domain::feature::Feature;
use miheater_domain::profile::ModelProfile;
use miheater_domain::property::{PropertySpec, PropertyValue};

/// Failure modes of the simulated transport.
#[derive(Debug, thiserror::Error)]
pub enum VirtualDeviceError {
    /// The simulated outage switch is on.
    #[error("simulated device unreachable")]
    Unreachable,

    /// The request addressed a property the device does not have.
    #[error("no property at {0}")]
    UnknownProperty(PropertySpec),
}

struct Inner {
    info: DeviceInfo,
    values: Mutex<HashMap<PropertySpec, PropertyValue>>,
    failing: AtomicBool,
}

/// A simulated heater. Cloning shares the device state, so a test can
/// keep a handle for assertions and failure injection after moving a
/// clone into the integration.
#[derive(Clone)]
pub struct VirtualHeater {
    inner: Arc<Inner>,
}

impl VirtualHeater {
    /// Create a simulated device answering for `profile`'s model, with
    /// every supported property seeded to a plausible idle default
    /// (powered off, 22 °C ambient, mid-range target).
    #[must_use]
    pub fn new(profile: &ModelProfile) -> Self {
        let mut values = HashMap::new();
        for feature in profile.supported_features() {
            if let Some(spec) = profile.property(feature) {
                values.insert(spec, default_value(feature, profile));
            }
        }

        Self {
            inner: Arc::new(Inner {
                info: DeviceInfo {
                    model: profile.model.clone(),
                    firmware_version: Some("2.1.3".to_string()),
                    hardware_version: Some("esp32".to_string()),
                    mac: Some("A4:C1:38:00:11:22".to_string()),
                },
                values: Mutex::new(values),
                failing: AtomicBool::new(false),
            }),
        }
    }

    /// Switch the simulated outage on or off.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Current value of a property, if seeded.
    #[must_use]
    pub fn value(&self, spec: PropertySpec) -> Option<PropertyValue> {
        self.lock_values().get(&spec).cloned()
    }

    /// Seed or overwrite a property value directly (test setup).
    pub fn insert(&self, spec: PropertySpec, value: PropertyValue) {
        self.lock_values().insert(spec, value);
    }

    fn check_reachable(&self) -> Result<(), CommunicationError> {
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(transport_error("get_properties", VirtualDeviceError::Unreachable));
        }
        Ok(())
    }

    fn lock_values(&self) -> MutexGuard<'_, HashMap<PropertySpec, PropertyValue>> {
        self.inner
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl MiotClient for VirtualHeater {
    async fn info(&self) -> Result<DeviceInfo, CommunicationError> {
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(transport_error("info", VirtualDeviceError::Unreachable));
        }
        Ok(self.inner.info.clone())
    }

    async fn get_properties(
        &self,
        specs: &[PropertySpec],
    ) -> Result<Vec<PropertyValue>, CommunicationError> {
        self.check_reachable()?;
        let values = self.lock_values();
        specs
            .iter()
            .map(|spec| {
                values.get(spec).cloned().ok_or_else(|| {
                    transport_error("get_properties", VirtualDeviceError::UnknownProperty(*spec))
                })
            })
            .collect()
    }

    async fn set_property(
        &self,
        spec: PropertySpec,
        value: PropertyValue,
    ) -> Result<(), CommunicationError> {
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(transport_error("set_property", VirtualDeviceError::Unreachable));
        }
        let mut values = self.lock_values();
        if !values.contains_key(&spec) {
            return Err(transport_error(
                "set_property",
                VirtualDeviceError::UnknownProperty(spec),
            ));
        }
        tracing::debug!(property = %spec, ?value, "virtual property write");
        values.insert(spec, value);
        Ok(())
    }
}

fn transport_error(operation: &'static str, err: VirtualDeviceError) -> CommunicationError {
    CommunicationError::Transport {
        operation,
        source: Box::new(err),
    }
}

fn default_value(feature: Feature, profile: &ModelProfile) -> PropertyValue {
    match feature {
        Feature::Power => PropertyValue::Bool(false),
        Feature::Temperature => PropertyValue::Float(22.0),
        Feature::TargetTemperature => {
            PropertyValue::Float((profile.temp_min + profile.temp_max) / 2.0)
        }
        Feature::RelativeHumidity => PropertyValue::Float(45.0),
        Feature::Buzzer => PropertyValue::Bool(true),
        Feature::ChildLock => PropertyValue::Bool(false),
        Feature::LedBrightness => PropertyValue::Int(0),
        Feature::DelayOff => PropertyValue::Int(0),
    }
}
