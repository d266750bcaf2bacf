//! Entity — a single observable/controllable aspect of the heater as
//! published to the host platform (the climate entity, the buzzer switch,
//! the delay-off number, …).

mod attribute_value;
mod state;

pub use attribute_value::AttributeValue;
pub use state::EntityState;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MiHeaterError, ValidationError};
use crate::id::{DeviceId, EntityId};
use crate::time::Timestamp;

/// Descriptor and current state of one published entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub device_id: Option<DeviceId>,
    /// Platform-qualified id, e.g. `climate.mi_heater` or
    /// `switch.mi_heater_buzzer`.
    pub entity_id: String,
    pub friendly_name: String,
    pub state: EntityState,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub last_changed: Timestamp,
    pub last_updated: Timestamp,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::Validation`] when `entity_id` or
    /// `friendly_name` is empty.
    pub fn validate(&self) -> Result<(), MiHeaterError> {
        if self.entity_id.is_empty() {
            return Err(ValidationError::EmptyEntityId.into());
        }
        if self.friendly_name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// The platform prefix of `entity_id` (`"climate"`, `"switch"`, …).
    #[must_use]
    pub fn platform(&self) -> &str {
        self.entity_id
            .split_once('.')
            .map_or(self.entity_id.as_str(), |(platform, _)| platform)
    }

    /// Look up a typed attribute by name.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Replace the state, tracking change and update timestamps.
    ///
    /// `last_updated` always advances; `last_changed` only moves when the
    /// state actually differs.
    pub fn update_state(&mut self, state: EntityState, at: Timestamp) {
        if self.state != state {
            self.state = state;
            self.last_changed = at;
        }
        self.last_updated = at;
    }

    /// Insert or replace an attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(name.into(), value);
    }
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    id: Option<EntityId>,
    device_id: Option<DeviceId>,
    entity_id: Option<String>,
    friendly_name: Option<String>,
    state: EntityState,
    attributes: BTreeMap<String, AttributeValue>,
}

impl EntityBuilder {
    #[must_use]
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: EntityState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Consume the builder, validate, and return an [`Entity`].
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::Validation`] if `entity_id` or
    /// `friendly_name` is missing or empty.
    pub fn build(self) -> Result<Entity, MiHeaterError> {
        let at = crate::time::now();
        let entity = Entity {
            id: self.id.unwrap_or_default(),
            device_id: self.device_id,
            entity_id: self.entity_id.unwrap_or_default(),
            friendly_name: self.friendly_name.unwrap_or_default(),
            state: self.state,
            attributes: self.attributes,
            last_changed: at,
            last_updated: at,
        };
        entity.validate()?;
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    fn sample() -> Entity {
        Entity::builder()
            .entity_id("climate.mi_heater")
            .friendly_name("Mi Heater")
            .state(EntityState::Off)
            .attribute("target_temperature", AttributeValue::Float(22.0))
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_valid_entity_with_attributes() {
        let entity = sample();
        assert_eq!(entity.entity_id, "climate.mi_heater");
        assert_eq!(entity.state, EntityState::Off);
        assert_eq!(
            entity.get_attribute("target_temperature"),
            Some(&AttributeValue::Float(22.0))
        );
        assert_eq!(entity.get_attribute("missing"), None);
    }

    #[test]
    fn should_return_validation_error_when_entity_id_is_empty() {
        let result = Entity::builder().friendly_name("Mi Heater").build();
        assert!(matches!(
            result,
            Err(MiHeaterError::Validation(ValidationError::EmptyEntityId))
        ));
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Entity::builder().entity_id("climate.x").build();
        assert!(matches!(
            result,
            Err(MiHeaterError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_extract_platform_prefix() {
        assert_eq!(sample().platform(), "climate");
    }

    #[test]
    fn should_advance_last_changed_only_on_state_change() {
        let mut entity = sample();
        let first_changed = entity.last_changed;

        let t1 = now();
        entity.update_state(EntityState::Off, t1);
        assert_eq!(entity.last_changed, first_changed);
        assert_eq!(entity.last_updated, t1);

        let t2 = now();
        entity.update_state(EntityState::On, t2);
        assert_eq!(entity.last_changed, t2);
        assert_eq!(entity.last_updated, t2);
    }

    #[test]
    fn should_replace_attribute_value() {
        let mut entity = sample();
        entity.set_attribute("target_temperature", AttributeValue::Float(24.0));
        assert_eq!(
            entity.get_attribute("target_temperature"),
            Some(&AttributeValue::Float(24.0))
        );
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let entity = sample();
        let json = serde_json::to_string(&entity).unwrap();
        let parsed: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, entity.id);
        assert_eq!(parsed.entity_id, entity.entity_id);
        assert_eq!(parsed.attributes, entity.attributes);
    }
}
