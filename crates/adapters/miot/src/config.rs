//! Heater integration configuration.

use serde::Deserialize;

/// Configuration for one configured heater (the host platform's config
/// entry).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeaterConfig {
    /// Device IP address.
    pub host: String,
    /// 32-hex-char device token.
    pub token: String,
    /// Manual model override. When set, it takes precedence over the
    /// model string the device reports — the escape hatch for devices
    /// whose reported model has no registry row yet.
    pub model: Option<String>,
    /// Friendly device name, also the base of published entity ids.
    pub name: String,
}

impl Default for HeaterConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            token: String::new(),
            model: None,
            name: "Mi Heater".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_mi_heater_name() {
        let config = HeaterConfig::default();
        assert_eq!(config.name, "Mi Heater");
        assert!(config.model.is_none());
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let config: HeaterConfig = toml::from_str(
            "
            host = '192.168.1.40'
            token = 'ffffffffffffffffffffffffffffffff'
            ",
        )
        .unwrap();
        assert_eq!(config.host, "192.168.1.40");
        assert_eq!(config.name, "Mi Heater");
        assert!(config.model.is_none());
    }

    #[test]
    fn should_parse_model_override() {
        let config: HeaterConfig = toml::from_str("model = 'zhimi.heater.za2'").unwrap();
        assert_eq!(config.model.as_deref(), Some("zhimi.heater.za2"));
    }
}
