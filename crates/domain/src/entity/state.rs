//! Entity state — the current operational state of a published entity.

use serde::{Deserialize, Serialize};

/// Discrete operational state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    On,
    Off,
    #[default]
    Unknown,
    /// The device stopped answering; cached attributes stay visible.
    Unavailable,
}

impl EntityState {
    /// Map a heater power reading onto an entity state.
    #[must_use]
    pub fn from_power(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    /// Whether the entity is reachable (anything but [`Unavailable`](Self::Unavailable)).
    #[must_use]
    pub fn is_available(self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_power_reading_onto_state() {
        assert_eq!(EntityState::from_power(true), EntityState::On);
        assert_eq!(EntityState::from_power(false), EntityState::Off);
    }

    #[test]
    fn should_report_only_unavailable_as_unreachable() {
        assert!(EntityState::On.is_available());
        assert!(EntityState::Off.is_available());
        assert!(EntityState::Unknown.is_available());
        assert!(!EntityState::Unavailable.is_available());
    }

    #[test]
    fn should_default_to_unknown() {
        assert_eq!(EntityState::default(), EntityState::Unknown);
    }

    #[test]
    fn should_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&EntityState::Unavailable).unwrap(), "\"unavailable\"");
    }

    #[test]
    fn should_display_lowercase_variant_name() {
        assert_eq!(EntityState::On.to_string(), "on");
        assert_eq!(EntityState::Unavailable.to_string(), "unavailable");
    }
}
