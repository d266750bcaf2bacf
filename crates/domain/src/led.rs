//! LED / display brightness modes.
//!
//! Zhimi heaters encode the indicator brightness as a small integer:
//! 0 = bright, 1 = dim, 2 = off. Not every model offers the dim level.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Brightness mode of the heater's display/indicator LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedMode {
    Bright,
    Dim,
    Off,
}

impl LedMode {
    /// The integer value written to the device for this mode.
    #[must_use]
    pub fn wire_value(self) -> i64 {
        match self {
            Self::Bright => 0,
            Self::Dim => 1,
            Self::Off => 2,
        }
    }

    /// Decode a device-reported integer into a mode.
    #[must_use]
    pub fn from_wire(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Bright),
            1 => Some(Self::Dim),
            2 => Some(Self::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for LedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bright => f.write_str("bright"),
            Self::Dim => f.write_str("dim"),
            Self::Off => f.write_str("off"),
        }
    }
}

impl std::str::FromStr for LedMode {
    type Err = ValidationError;

    /// Parse a service-call payload value. `"on"` is accepted as an alias
    /// for `"bright"`, matching the host platform's service schema.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bright" | "on" => Ok(Self::Bright),
            "dim" => Ok(Self::Dim),
            "off" => Ok(Self::Off),
            other => Err(ValidationError::UnknownLedMode(other.to_string())),
        }
    }
}
