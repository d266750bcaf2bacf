//! Use-cases orchestrating domain objects through ports.

pub mod heater;

pub use heater::Heater;
