//! MiOT client port — the property-access capability of one device.
//!
//! This is a **port** — the MiOT transport (encrypted UDP in production,
//! an in-memory simulation in tests) lives in an adapter crate. The
//! application core only ever reads and writes named properties through
//! this trait; identifiers come from the active model profile.

use std::future::Future;

use miheater_domain::error::CommunicationError;
use miheater_domain::property::{PropertySpec, PropertyValue};
use serde::{Deserialize, Serialize};

/// Static device identification, queried once at setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Vendor model string, e.g. `zhimi.heater.za2`. Drives profile
    /// resolution.
    pub model: String,
    pub firmware_version: Option<String>,
    pub hardware_version: Option<String>,
    /// MAC address when the transport knows it; used as the stable
    /// unique id in preference to the IP address.
    pub mac: Option<String>,
}

/// Property-access client for one connected MiOT device.
///
/// Implementations must be safe for sequential calls from one caller at
/// a time; no retries or transactions are expected (failures surface as
/// [`CommunicationError`] and the host's next poll retries naturally).
pub trait MiotClient: Send + Sync {
    /// Query static device identification.
    fn info(&self) -> impl Future<Output = Result<DeviceInfo, CommunicationError>> + Send;

    /// Read a batch of properties in one request.
    ///
    /// The result is positional: `values[i]` answers `specs[i]`.
    fn get_properties(
        &self,
        specs: &[PropertySpec],
    ) -> impl Future<Output = Result<Vec<PropertyValue>, CommunicationError>> + Send;

    /// Write a single property.
    fn set_property(
        &self,
        spec: PropertySpec,
        value: PropertyValue,
    ) -> impl Future<Output = Result<(), CommunicationError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_device_info_through_serde_json() {
        let info = DeviceInfo {
            model: "zhimi.heater.za2".to_string(),
            firmware_version: Some("2.1.3".to_string()),
            hardware_version: None,
            mac: Some("A4:C1:38:00:11:22".to_string()),
        };
        let json = serde_json::to_string(&info).unwrap();
        let parsed: DeviceInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, info);
    }
}
