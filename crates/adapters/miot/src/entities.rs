//! Device and entity construction.
//!
//! The entity set is fixed at setup from the resolved profile: a climate
//! entity always, a buzzer switch, a child-lock switch, and a delay-off
//! number only when the profile advertises the feature. Entity ids stay
//! stable across polls; snapshots are rebuilt from the latest status.

use miheater_domain::device::Device;
use miheater_domain::entity::{AttributeValue, Entity, EntityState};
use miheater_domain::error::{MiHeaterError, NotFoundError};
use miheater_domain::feature::Feature;
use miheater_domain::id::{DeviceId, EntityId};
use miheater_domain::profile::ModelProfile;
use miheater_domain::status::HeaterStatus;

/// Which facade operation an entity maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRole {
    Climate,
    Buzzer,
    ChildLock,
    DelayOff,
}

#[derive(Debug, Clone)]
struct Handle {
    id: EntityId,
    entity_id: String,
    name: String,
}

impl Handle {
    fn new(entity_id: String, name: String) -> Self {
        Self {
            id: EntityId::new(),
            entity_id,
            name,
        }
    }
}

/// The stable set of entities published for one heater.
#[derive(Debug, Clone)]
pub struct EntitySet {
    pub device: Device,
    climate: Handle,
    buzzer: Option<Handle>,
    child_lock: Option<Handle>,
    delay_off: Option<Handle>,
}

impl EntitySet {
    /// Build the device descriptor and entity handles for `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::Validation`] when `name` or `unique_id`
    /// is empty.
    pub fn new(name: &str, unique_id: &str, profile: &ModelProfile) -> Result<Self, MiHeaterError> {
        let device = Device::builder()
            .id(DeviceId::new())
            .name(name)
            .manufacturer("Zhimi")
            .model(&profile.model)
            .integration("miot")
            .unique_id(unique_id)
            .build()?;

        let slug = slugify(name);
        let climate = Handle::new(format!("climate.{slug}"), name.to_string());
        let buzzer = profile
            .supports(Feature::Buzzer)
            .then(|| Handle::new(format!("switch.{slug}_buzzer"), format!("{name} Buzzer")));
        let child_lock = profile.supports(Feature::ChildLock).then(|| {
            Handle::new(
                format!("switch.{slug}_child_lock"),
                format!("{name} Child Lock"),
            )
        });
        let delay_off = profile.supports(Feature::DelayOff).then(|| {
            Handle::new(
                format!("number.{slug}_delay_off"),
                format!("{name} Delay Off"),
            )
        });

        Ok(Self {
            device,
            climate,
            buzzer,
            child_lock,
            delay_off,
        })
    }

    /// Map an entity id back to the facade operation it drives.
    #[must_use]
    pub fn role_of(&self, id: EntityId) -> Option<EntityRole> {
        if self.climate.id == id {
            return Some(EntityRole::Climate);
        }
        let matches = |handle: &Option<Handle>| handle.as_ref().is_some_and(|h| h.id == id);
        if matches(&self.buzzer) {
            Some(EntityRole::Buzzer)
        } else if matches(&self.child_lock) {
            Some(EntityRole::ChildLock)
        } else if matches(&self.delay_off) {
            Some(EntityRole::DelayOff)
        } else {
            None
        }
    }

    /// All roles present in this set.
    #[must_use]
    pub fn roles(&self) -> Vec<EntityRole> {
        let mut roles = vec![EntityRole::Climate];
        if self.buzzer.is_some() {
            roles.push(EntityRole::Buzzer);
        }
        if self.child_lock.is_some() {
            roles.push(EntityRole::ChildLock);
        }
        if self.delay_off.is_some() {
            roles.push(EntityRole::DelayOff);
        }
        roles
    }

    /// Build fresh snapshots of every entity in the set.
    ///
    /// `status` carries the latest (possibly cached) reading; `available`
    /// is false when the device stopped answering, which marks every
    /// entity [`EntityState::Unavailable`] while keeping cached
    /// attributes visible.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::Validation`] if an entity descriptor
    /// fails its invariants.
    pub fn snapshots(
        &self,
        profile: &ModelProfile,
        status: Option<&HeaterStatus>,
        available: bool,
    ) -> Result<Vec<Entity>, MiHeaterError> {
        self.roles()
            .into_iter()
            .map(|role| self.snapshot(role, profile, status, available))
            .collect()
    }

    /// Build one entity snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`MiHeaterError::NotFound`] when `role` is not part of
    /// this set, or [`MiHeaterError::Validation`] if the descriptor
    /// fails its invariants.
    pub fn snapshot(
        &self,
        role: EntityRole,
        profile: &ModelProfile,
        status: Option<&HeaterStatus>,
        available: bool,
    ) -> Result<Entity, MiHeaterError> {
        let handle = match role {
            EntityRole::Climate => Some(&self.climate),
            EntityRole::Buzzer => self.buzzer.as_ref(),
            EntityRole::ChildLock => self.child_lock.as_ref(),
            EntityRole::DelayOff => self.delay_off.as_ref(),
        };
        let handle = handle.ok_or_else(|| NotFoundError {
            entity: "Entity",
            id: format!("{role:?}"),
        })?;

        let mut builder = Entity::builder()
            .id(handle.id)
            .device_id(self.device.id)
            .entity_id(handle.entity_id.clone())
            .friendly_name(handle.name.clone())
            .state(entity_state(role, status, available));

        if let Some(status) = status {
            builder = match role {
                EntityRole::Climate => climate_attributes(builder, profile, status),
                EntityRole::DelayOff => builder
                    .attribute("min", AttributeValue::Int(0))
                    .attribute("max", AttributeValue::Int(i64::from(profile.delay_off_max_secs)))
                    .attribute(
                        "value",
                        AttributeValue::Int(i64::from(status.delay_off_secs.unwrap_or(0))),
                    ),
                EntityRole::Buzzer | EntityRole::ChildLock => builder,
            };
        }

        builder.build()
    }
}

fn entity_state(role: EntityRole, status: Option<&HeaterStatus>, available: bool) -> EntityState {
    if !available {
        return EntityState::Unavailable;
    }
    let Some(status) = status else {
        return EntityState::Unknown;
    };
    match role {
        EntityRole::Climate => EntityState::from_power(status.power),
        EntityRole::Buzzer => status.buzzer.map_or(EntityState::Unknown, EntityState::from_power),
        EntityRole::ChildLock => status
            .child_lock
            .map_or(EntityState::Unknown, EntityState::from_power),
        EntityRole::DelayOff => {
            EntityState::from_power(status.delay_off_secs.is_some_and(|secs| secs > 0))
        }
    }
}

fn climate_attributes(
    builder: miheater_domain::entity::EntityBuilder,
    profile: &ModelProfile,
    status: &HeaterStatus,
) -> miheater_domain::entity::EntityBuilder {
    let mut builder = builder
        .attribute("min_temp", AttributeValue::Float(profile.temp_min))
        .attribute("max_temp", AttributeValue::Float(profile.temp_max))
        .attribute("temperature", AttributeValue::Float(status.temperature))
        .attribute(
            "target_temperature",
            AttributeValue::Float(status.target_temperature),
        );
    if let Some(humidity) = status.humidity {
        builder = builder.attribute("humidity", AttributeValue::Float(humidity));
    }
    if let Some(mode) = status.led_mode {
        builder = builder.attribute("led_brightness", AttributeValue::String(mode.to_string()));
    }
    builder
}

/// Lowercase a display name into an entity-id slug.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use miheater_domain::led::LedMode;
    use miheater_domain::property::PropertySpec;
    use miheater_domain::time::now;

    use super::*;

    fn full_profile() -> ModelProfile {
        ModelProfile::builder()
            .model("zhimi.heater.test")
            .temperature_range(16.0, 28.0)
            .power(PropertySpec::new(2, 2))
            .temperature(PropertySpec::new(5, 8))
            .target_temperature(PropertySpec::new(2, 6))
            .humidity(PropertySpec::new(5, 7))
            .buzzer(PropertySpec::new(3, 1))
            .child_lock(PropertySpec::new(6, 1))
            .led(PropertySpec::new(7, 3), [LedMode::Bright, LedMode::Off])
            .delay_off(PropertySpec::new(4, 1), 28_800)
            .build()
            .unwrap()
    }

    fn minimal_profile() -> ModelProfile {
        ModelProfile::builder()
            .model("zhimi.heater.test")
            .temperature_range(16.0, 28.0)
            .power(PropertySpec::new(2, 2))
            .temperature(PropertySpec::new(5, 8))
            .target_temperature(PropertySpec::new(2, 6))
            .build()
            .unwrap()
    }

    fn sample_status() -> HeaterStatus {
        HeaterStatus {
            power: true,
            temperature: 21.4,
            target_temperature: 24.0,
            humidity: Some(38.0),
            buzzer: Some(true),
            child_lock: Some(false),
            led_mode: Some(LedMode::Bright),
            delay_off_secs: Some(0),
            read_at: now(),
        }
    }

    #[test]
    fn should_slugify_display_names() {
        assert_eq!(slugify("Mi Heater"), "mi_heater");
        assert_eq!(slugify("Bedroom heater (2)"), "bedroom_heater_2");
        assert_eq!(slugify("  Heater  "), "heater");
    }

    #[test]
    fn should_publish_all_entities_for_full_profile() {
        let set = EntitySet::new("Mi Heater", "192.168.1.40", &full_profile()).unwrap();
        let entities = set.snapshots(&full_profile(), Some(&sample_status()), true).unwrap();

        let ids: Vec<&str> = entities.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "climate.mi_heater",
                "switch.mi_heater_buzzer",
                "switch.mi_heater_child_lock",
                "number.mi_heater_delay_off",
            ]
        );
    }

    #[test]
    fn should_publish_only_climate_for_minimal_profile() {
        let set = EntitySet::new("Mi Heater", "192.168.1.40", &minimal_profile()).unwrap();
        assert_eq!(set.roles(), vec![EntityRole::Climate]);
    }

    #[test]
    fn should_map_entity_ids_back_to_roles() {
        let set = EntitySet::new("Mi Heater", "x", &full_profile()).unwrap();
        let entities = set.snapshots(&full_profile(), None, true).unwrap();
        let roles: Vec<EntityRole> = entities
            .iter()
            .map(|e| set.role_of(e.id).unwrap())
            .collect();
        assert_eq!(
            roles,
            vec![
                EntityRole::Climate,
                EntityRole::Buzzer,
                EntityRole::ChildLock,
                EntityRole::DelayOff,
            ]
        );
        assert_eq!(set.role_of(EntityId::new()), None);
    }

    #[test]
    fn should_put_humidity_on_climate_only_when_read() {
        let set = EntitySet::new("Mi Heater", "x", &full_profile()).unwrap();

        let with = set
            .snapshot(EntityRole::Climate, &full_profile(), Some(&sample_status()), true)
            .unwrap();
        assert_eq!(with.get_attribute("humidity"), Some(&AttributeValue::Float(38.0)));

        let status = HeaterStatus {
            humidity: None,
            ..sample_status()
        };
        let without = set
            .snapshot(EntityRole::Climate, &full_profile(), Some(&status), true)
            .unwrap();
        assert_eq!(without.get_attribute("humidity"), None);
    }

    #[test]
    fn should_mirror_power_onto_climate_state() {
        let set = EntitySet::new("Mi Heater", "x", &full_profile()).unwrap();
        let on = set
            .snapshot(EntityRole::Climate, &full_profile(), Some(&sample_status()), true)
            .unwrap();
        assert_eq!(on.state, EntityState::On);

        let status = HeaterStatus {
            power: false,
            ..sample_status()
        };
        let off = set
            .snapshot(EntityRole::Climate, &full_profile(), Some(&status), true)
            .unwrap();
        assert_eq!(off.state, EntityState::Off);
    }

    #[test]
    fn should_mark_unavailable_but_keep_cached_attributes() {
        let set = EntitySet::new("Mi Heater", "x", &full_profile()).unwrap();
        let entity = set
            .snapshot(EntityRole::Climate, &full_profile(), Some(&sample_status()), false)
            .unwrap();
        assert_eq!(entity.state, EntityState::Unavailable);
        assert_eq!(
            entity.get_attribute("temperature"),
            Some(&AttributeValue::Float(21.4))
        );
    }

    #[test]
    fn should_report_unknown_before_first_read() {
        let set = EntitySet::new("Mi Heater", "x", &full_profile()).unwrap();
        let entity = set
            .snapshot(EntityRole::Climate, &full_profile(), None, true)
            .unwrap();
        assert_eq!(entity.state, EntityState::Unknown);
        assert_eq!(entity.get_attribute("temperature"), None);
    }

    #[test]
    fn should_bound_delay_off_number_by_profile_max() {
        let set = EntitySet::new("Mi Heater", "x", &full_profile()).unwrap();
        let entity = set
            .snapshot(EntityRole::DelayOff, &full_profile(), Some(&sample_status()), true)
            .unwrap();
        assert_eq!(entity.get_attribute("min"), Some(&AttributeValue::Int(0)));
        assert_eq!(entity.get_attribute("max"), Some(&AttributeValue::Int(28_800)));
        assert_eq!(entity.get_attribute("value"), Some(&AttributeValue::Int(0)));
        assert_eq!(entity.state, EntityState::Off);
    }

    #[test]
    fn should_refuse_snapshot_for_absent_role() {
        let set = EntitySet::new("Mi Heater", "x", &minimal_profile()).unwrap();
        let result = set.snapshot(EntityRole::Buzzer, &minimal_profile(), None, true);
        assert!(matches!(result, Err(MiHeaterError::NotFound(_))));
    }

    #[test]
    fn should_describe_device_from_profile() {
        let set = EntitySet::new("Mi Heater", "192.168.1.40", &full_profile()).unwrap();
        assert_eq!(set.device.manufacturer.as_deref(), Some("Zhimi"));
        assert_eq!(set.device.model.as_deref(), Some("zhimi.heater.test"));
        assert_eq!(set.device.unique_id, "192.168.1.40");
    }
}
