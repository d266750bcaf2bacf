//! MiOT property addressing and wire values.
//!
//! The MiOT protocol exposes device functionality as numbered services,
//! each holding numbered properties. A feature on one model may live at a
//! completely different address on another; profiles own the mapping.

use serde::{Deserialize, Serialize};

/// Address of one MiOT property: (service id, property id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Service instance id.
    pub siid: u8,
    /// Property instance id within the service.
    pub piid: u8,
}

impl PropertySpec {
    /// Build a property address.
    #[must_use]
    pub const fn new(siid: u8, piid: u8) -> Self {
        Self { siid, piid }
    }
}

impl std::fmt::Display for PropertySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.siid, self.piid)
    }
}

/// A value read from or written to a MiOT property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl PropertyValue {
    /// Boolean view; `None` for non-boolean values.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Integer view; `None` for non-integer values.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view; integers widen losslessly enough for heater ranges.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
