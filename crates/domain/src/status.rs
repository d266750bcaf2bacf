//! Heater status snapshots.

use serde::{Deserialize, Serialize};

use crate::led::LedMode;
use crate::time::Timestamp;

/// One fully-decoded reading of a heater.
///
/// Fields the active [`ModelProfile`](crate::profile::ModelProfile) does
/// not support are `None` and are omitted from the serialized form; a
/// consumer can not observe a value for a feature the device does not
/// have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaterStatus {
    /// Whether the heater is currently heating.
    pub power: bool,
    /// Ambient temperature, °C.
    pub temperature: f64,
    /// Configured target temperature, °C.
    pub target_temperature: f64,
    /// Relative humidity, percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buzzer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_lock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led_mode: Option<LedMode>,
    /// Remaining delay-off countdown, seconds. `Some(0)` means supported
    /// but inactive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_off_secs: Option<u32>,
    /// When this snapshot was read from the device.
    pub read_at: Timestamp,
}
