//! # miheater-adapter-miot
//!
//! Xiaomi MiOT heater integration — resolves a device's capability
//! profile at setup and publishes it as host-platform entities.
//!
//! ## Published entities
//!
//! | Entity | Condition | Behaviour |
//! |--------|-----------|-----------|
//! | `climate.<slug>` | always | power + target temperature, `set_temperature`, LED/buzzer/child-lock/delay-off services |
//! | `switch.<slug>_buzzer` | profile has buzzer | `turn_on` / `turn_off` / `toggle` |
//! | `switch.<slug>_child_lock` | profile has child lock | `turn_on` / `turn_off` / `toggle` |
//! | `number.<slug>_delay_off` | profile has delay-off | `set_value`, clamped to the profile maximum |
//!
//! An entity is published only when the active profile maps the feature;
//! there is no probing and no default identifier.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `miheater-app` and
//! `miheater-domain` only. The MiOT transport arrives through the
//! [`MiotClient`] port.

mod config;
mod entities;
pub mod models;

pub use config::HeaterConfig;
pub use entities::{EntityRole, EntitySet};

use miheater_app::ports::integration::{DiscoveredDevice, Integration};
use miheater_app::ports::miot::MiotClient;
use miheater_app::services::heater::Heater;
use miheater_domain::entity::Entity;
use miheater_domain::error::{
    MiHeaterError, ModelNotFoundError, NotFoundError, ValidationError,
};
use miheater_domain::id::EntityId;
use miheater_domain::led::LedMode;
use miheater_domain::status::HeaterStatus;

/// The MiOT heater integration for one configured device.
pub struct HeaterIntegration<C: MiotClient> {
    config: HeaterConfig,
    /// Transport, held until `setup` hands it to the facade.
    client: Option<C>,
    session: Option<Session<C>>,
}

struct Session<C: MiotClient> {
    heater: Heater<C>,
    entities: EntitySet,
}

impl<C: MiotClient> HeaterIntegration<C> {
    /// Create the integration for one configured device.
    #[must_use]
    pub fn new(config: HeaterConfig, client: C) -> Self {
        Self {
            config,
            client: Some(client),
            session: None,
        }
    }

    /// Check whether this integration owns the given entity.
    #[must_use]
    pub fn owns_entity(&self, entity_id: EntityId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.entities.role_of(entity_id).is_some())
    }

    fn session(&self) -> Result<&Session<C>, MiHeaterError> {
        self.session.as_ref().ok_or_else(|| {
            NotFoundError {
                entity: "Session",
                id: self.config.name.clone(),
            }
            .into()
        })
    }

    /// Latest reading — the cache when warm, a fresh read otherwise.
    async fn current_status(heater: &Heater<C>) -> Result<HeaterStatus, MiHeaterError> {
        match heater.cached_status() {
            Some(status) => Ok(status),
            None => heater.status().await,
        }
    }

    async fn dispatch(
        &self,
        session: &Session<C>,
        role: EntityRole,
        service: &str,
        data: &serde_json::Value,
    ) -> Result<(), MiHeaterError> {
        let heater = &session.heater;
        match (role, service) {
            (EntityRole::Climate, "turn_on") => heater.set_power(true).await,
            (EntityRole::Climate, "turn_off") => heater.set_power(false).await,
            (EntityRole::Climate, "set_temperature") => {
                heater
                    .set_target_temperature(require_f64(data, "temperature")?)
                    .await
            }
            (EntityRole::Climate, "set_led_brightness") => {
                let mode: LedMode = require_str(data, "brightness")?.parse()?;
                heater.set_led_mode(mode).await
            }
            (EntityRole::Climate, "set_buzzer") => {
                heater.set_buzzer(require_bool(data, "enabled")?).await
            }
            (EntityRole::Climate, "set_child_lock") => {
                heater.set_child_lock(require_bool(data, "lock")?).await
            }
            (EntityRole::Climate, "set_delay_off") => {
                heater.set_delay_off(require_u32(data, "seconds")?).await?;
                Ok(())
            }
            (EntityRole::Buzzer, "turn_on") => heater.set_buzzer(true).await,
            (EntityRole::Buzzer, "turn_off") => heater.set_buzzer(false).await,
            (EntityRole::Buzzer, "toggle") => {
                let current = Self::current_status(heater).await?.buzzer.unwrap_or(false);
                heater.set_buzzer(!current).await
            }
            (EntityRole::ChildLock, "turn_on") => heater.set_child_lock(true).await,
            (EntityRole::ChildLock, "turn_off") => heater.set_child_lock(false).await,
            (EntityRole::ChildLock, "toggle") => {
                let current = Self::current_status(heater)
                    .await?
                    .child_lock
                    .unwrap_or(false);
                heater.set_child_lock(!current).await
            }
            (EntityRole::DelayOff, "set_value") => {
                heater.set_delay_off(require_u32(data, "value")?).await?;
                Ok(())
            }
            _ => Err(NotFoundError {
                entity: "Service",
                id: service.to_string(),
            }
            .into()),
        }
    }
}

impl<C: MiotClient> Integration for HeaterIntegration<C> {
    fn name(&self) -> &'static str {
        "miot"
    }

    async fn setup(&mut self) -> Result<Vec<DiscoveredDevice>, MiHeaterError> {
        let Some(client) = self.client.take() else {
            // Already set up: republish the current entity set.
            let session = self.session()?;
            let cached = session.heater.cached_status();
            let snapshots =
                session
                    .entities
                    .snapshots(session.heater.profile(), cached.as_ref(), true)?;
            return Ok(vec![DiscoveredDevice {
                device: session.entities.device.clone(),
                entities: snapshots,
            }]);
        };

        let info = client.info().await?;
        // A manual override takes precedence over detection — the escape
        // hatch when the reported model has no registry row.
        let model = self.config.model.clone().unwrap_or_else(|| info.model.clone());
        let profile = models::lookup(&model)
            .ok_or_else(|| ModelNotFoundError { model: model.clone() })?;

        tracing::info!(
            model = %profile.model,
            detected = %info.model,
            features = profile.supported_features().len(),
            "heater profile resolved"
        );

        let unique_id = info
            .mac
            .filter(|mac| !mac.is_empty())
            .or_else(|| (!self.config.host.is_empty()).then(|| self.config.host.clone()))
            .unwrap_or_else(|| self.config.name.clone());

        let entities = EntitySet::new(&self.config.name, &unique_id, &profile)?;
        let heater = Heater::new(profile, client);

        // First refresh: a device that cannot be read fails setup.
        let status = heater.status().await?;
        let snapshots = entities.snapshots(heater.profile(), Some(&status), true)?;
        let discovered = DiscoveredDevice {
            device: entities.device.clone(),
            entities: snapshots,
        };

        self.session = Some(Session { heater, entities });
        Ok(vec![discovered])
    }

    async fn handle_service_call(
        &self,
        entity_id: EntityId,
        service: &str,
        data: serde_json::Value,
    ) -> Result<Entity, MiHeaterError> {
        let session = self.session()?;
        let role = session
            .entities
            .role_of(entity_id)
            .ok_or_else(|| NotFoundError {
                entity: "Entity",
                id: entity_id.to_string(),
            })?;

        tracing::debug!(?role, service, "service call");
        self.dispatch(session, role, service, &data).await?;

        let status = session.heater.status().await?;
        session
            .entities
            .snapshot(role, session.heater.profile(), Some(&status), true)
    }

    async fn poll(&self) -> Result<Vec<Entity>, MiHeaterError> {
        let session = self.session()?;
        match session.heater.status().await {
            Ok(status) => {
                session
                    .entities
                    .snapshots(session.heater.profile(), Some(&status), true)
            }
            Err(MiHeaterError::Communication(err)) => {
                tracing::warn!(error = %err, "poll failed; marking entities unavailable");
                let cached = session.heater.cached_status();
                session
                    .entities
                    .snapshots(session.heater.profile(), cached.as_ref(), false)
            }
            Err(other) => Err(other),
        }
    }

    async fn teardown(&mut self) -> Result<(), MiHeaterError> {
        self.session = None;
        tracing::info!("miot integration stopped");
        Ok(())
    }
}

fn require_f64(data: &serde_json::Value, field: &'static str) -> Result<f64, MiHeaterError> {
    data.get(field)
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| ValidationError::MissingServiceField(field).into())
}

fn require_bool(data: &serde_json::Value, field: &'static str) -> Result<bool, MiHeaterError> {
    data.get(field)
        .and_then(serde_json::Value::as_bool)
        .ok_or_else(|| ValidationError::MissingServiceField(field).into())
}

fn require_str<'a>(
    data: &'a serde_json::Value,
    field: &'static str,
) -> Result<&'a str, MiHeaterError> {
    data.get(field)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ValidationError::MissingServiceField(field).into())
}

fn require_u32(data: &serde_json::Value, field: &'static str) -> Result<u32, MiHeaterError> {
    data.get(field)
        .and_then(serde_json::Value::as_u64)
        .map(|value| u32::try_from(value).unwrap_or(u32::MAX))
        .ok_or_else(|| ValidationError::MissingServiceField(field).into())
}
