//! # miheater-domain
//!
//! Pure domain model for the miheater integration.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **model profiles** (which features and MiOT identifiers apply
//!   to one physical heater model) and their invariants
//! - Define **status snapshots** (the typed result of reading a heater)
//! - Define **Devices** and **Entities** (the descriptors published to the
//!   host automation platform)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO
//! crates. All IO boundaries are expressed as traits in the `app` crate
//! (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod entity;
pub mod feature;
pub mod led;
pub mod profile;
pub mod property;
pub mod status;
