//! Common error types used across the workspace.
//!
//! Every layer works with typed errors that convert into [`MiHeaterError`]
//! via `#[from]`. Support checks (`OutOfRange`, `UnsupportedFeature`)
//! always fail before any network call; `Communication` is the only
//! variant that can surface after a call reached the device.

use crate::feature::Feature;
use crate::led::LedMode;

/// Top-level error for the miheater workspace.
#[derive(Debug, thiserror::Error)]
pub enum MiHeaterError {
    /// A domain invariant or input payload check failed.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced entity or device does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The device reported a model string with no capability profile.
    /// Recoverable: the host falls back to manual model selection.
    #[error("unknown heater model")]
    ModelNotFound(#[from] ModelNotFoundError),

    /// Reading or writing the device failed. Entities go unavailable and
    /// the host retries on its next poll cycle.
    #[error("device communication failed")]
    Communication(#[from] CommunicationError),

    /// A setter value falls outside the active profile's bounds.
    #[error("value out of range")]
    OutOfRange(#[from] OutOfRangeError),

    /// The active profile does not advertise the requested feature.
    #[error("feature not supported by this model")]
    UnsupportedFeature(#[from] UnsupportedFeatureError),
}

/// Domain invariant and payload validation failures.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A name field was empty.
    #[error("name must not be empty")]
    EmptyName,

    /// An entity id string was empty.
    #[error("entity id must not be empty")]
    EmptyEntityId,

    /// A device unique id was empty.
    #[error("unique id must not be empty")]
    EmptyUniqueId,

    /// A model id string was empty.
    #[error("model id must not be empty")]
    EmptyModel,

    /// `temp_min` must be strictly below `temp_max`.
    #[error("temperature range {min}..{max} is invalid")]
    TemperatureRange { min: f64, max: f64 },

    /// A feature flag is set but the property map has no entry for it.
    #[error("feature {feature} is flagged but has no property mapping")]
    UnmappedFeature { feature: Feature },

    /// LED support is flagged but the mode set is empty.
    #[error("led is supported but no led modes are declared")]
    EmptyLedModes,

    /// Delay-off support is flagged with a zero maximum.
    #[error("delay-off is supported but the maximum is zero seconds")]
    ZeroDelayOffMax,

    /// A service-call payload is missing a required field.
    #[error("missing service field {0:?}")]
    MissingServiceField(&'static str),

    /// A service-call payload carried an unparseable LED mode.
    #[error("unknown led mode {0:?}")]
    UnknownLedMode(String),
}

/// A lookup by id failed.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of object looked up (e.g. "Entity").
    pub entity: &'static str,
    /// The id that was requested.
    pub id: String,
}

/// No capability profile exists for the reported model string.
#[derive(Debug, thiserror::Error)]
#[error("no capability profile for model {model:?}")]
pub struct ModelNotFoundError {
    /// The model string the device reported (or the override supplied).
    pub model: String,
}

/// Reading or writing the device failed.
#[derive(Debug, thiserror::Error)]
pub enum CommunicationError {
    /// The transport returned an error.
    #[error("{operation} failed")]
    Transport {
        /// Client operation that failed ("info", "get_properties", "set_property").
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The device answered a batched read with the wrong number of values.
    #[error("device returned {actual} values for {expected} requested properties")]
    ShortRead { expected: usize, actual: usize },

    /// The device answered with a value of an unexpected type.
    #[error("unexpected value type for {feature}")]
    UnexpectedType { feature: Feature },
}

/// A setter value falls outside the profile's advertised bounds.
#[derive(Debug, thiserror::Error)]
#[error("{feature} value {value} outside [{min}, {max}]")]
pub struct OutOfRangeError {
    pub feature: Feature,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// The active profile does not advertise the requested capability.
#[derive(Debug, thiserror::Error)]
pub enum UnsupportedFeatureError {
    /// The feature as a whole is absent from the profile.
    #[error("model {model} does not support {feature}")]
    Feature { model: String, feature: Feature },

    /// LED is supported, but not the requested brightness level.
    #[error("model {model} does not support led mode {mode}")]
    LedMode { model: String, mode: LedMode },
}
