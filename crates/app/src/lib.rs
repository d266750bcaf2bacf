//! # miheater-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **outbound port** [`MiotClient`](ports::miot::MiotClient):
//!   the property-access capability a transport adapter must provide. The
//!   MiOT wire protocol itself is not implemented in this workspace.
//! - Define the **inbound port** [`Integration`](ports::integration::Integration):
//!   the lifecycle the host platform drives (setup, service calls,
//!   teardown).
//! - Provide the [`Heater`](services::heater::Heater) facade: typed
//!   getters/setters over one device, validated against the active
//!   [`ModelProfile`](miheater_domain::profile::ModelProfile) before any
//!   network call.
//!
//! ## Dependency rule
//! Depends on `miheater-domain` only. Never imports adapter crates;
//! adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
