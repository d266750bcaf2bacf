//! Integration port — lifecycle and service-call handling.
//!
//! An integration bridges one device protocol into the host automation
//! platform. The host calls the lifecycle methods in order:
//!
//! 1. [`setup`](Integration::setup) — detect the device, resolve its
//!    capability profile, publish discovered devices/entities
//! 2. (the host runs, forwarding user commands via
//!    [`handle_service_call`](Integration::handle_service_call) and
//!    polling state on its own schedule)
//! 3. [`teardown`](Integration::teardown) — release the device session

use std::future::Future;

use miheater_domain::device::Device;
use miheater_domain::entity::Entity;
use miheater_domain::error::MiHeaterError;
use miheater_domain::id::EntityId;

/// A device and its associated entities discovered during setup.
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    pub device: Device,
    pub entities: Vec<Entity>,
}

/// A pluggable device integration.
pub trait Integration {
    /// Unique name identifying this integration (e.g. `"miot"`).
    fn name(&self) -> &'static str;

    /// Initialise the device session and return everything discovered.
    ///
    /// For the MiOT heater this performs model detection and capability
    /// resolution; an unknown model fails with
    /// [`MiHeaterError::ModelNotFound`] so the host can offer manual
    /// model selection.
    fn setup(&mut self)
    -> impl Future<Output = Result<Vec<DiscoveredDevice>, MiHeaterError>> + Send;

    /// Handle a user command directed at an entity owned by this
    /// integration, returning the entity's state after the call.
    fn handle_service_call(
        &self,
        entity_id: EntityId,
        service: &str,
        data: serde_json::Value,
    ) -> impl Future<Output = Result<Entity, MiHeaterError>> + Send;

    /// Refresh state from the device and return updated entity
    /// snapshots. Called by the host on its poll schedule; a failing
    /// device yields entities marked unavailable, not an error.
    fn poll(&self) -> impl Future<Output = Result<Vec<Entity>, MiHeaterError>> + Send;

    /// Called on graceful shutdown or integration unload.
    fn teardown(&mut self) -> impl Future<Output = Result<(), MiHeaterError>> + Send;
}
