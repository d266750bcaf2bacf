//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `miheaterd.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The configured heater.
    pub device: DeviceConfig,
    /// Poll loop settings.
    pub poll: PollConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// One heater's connection settings (the config entry).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device IP address. Empty selects the simulated transport.
    pub host: String,
    /// 32-hex-char device token.
    pub token: String,
    /// Manual model override (skips detection).
    pub model: Option<String>,
    /// Friendly name, also the base of entity ids.
    pub name: String,
}

/// Poll loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds between state refreshes.
    pub interval_secs: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `miheaterd.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("miheaterd.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MIHEATER_HOST") {
            self.device.host = val;
        }
        if let Ok(val) = std::env::var("MIHEATER_TOKEN") {
            self.device.token = val;
        }
        if let Ok(val) = std::env::var("MIHEATER_MODEL") {
            self.device.model = Some(val);
        }
        if let Ok(val) = std::env::var("MIHEATER_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll interval must be non-zero".to_string(),
            ));
        }
        if !self.device.host.is_empty() && !is_valid_token(&self.device.token) {
            return Err(ConfigError::Validation(
                "token must be 32 hex characters".to_string(),
            ));
        }
        Ok(())
    }

    /// The heater's integration config entry.
    #[must_use]
    pub fn heater(&self) -> miheater_adapter_miot::HeaterConfig {
        miheater_adapter_miot::HeaterConfig {
            host: self.device.host.clone(),
            token: self.device.token.clone(),
            model: self.device.model.clone(),
            name: self.device.name.clone(),
        }
    }

    /// Interval between state refreshes.
    #[must_use]
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.poll.interval_secs))
    }
}

fn is_valid_token(token: &str) -> bool {
    token.len() == 32 && token.chars().all(|c| c.is_ascii_hexdigit())
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            token: String::new(),
            model: None,
            name: "Mi Heater".to_string(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "miheaterd=info,miheater=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.device.name, "Mi Heater");
        assert!(config.device.host.is_empty());
        assert_eq!(config.poll.interval_secs, 30);
        assert!(config.device.model.is_none());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.poll.interval_secs, 30);
    }

    #[test]
    fn should_parse_full_toml() {
        let config: Config = toml::from_str(
            "
            [device]
            host = '192.168.1.40'
            token = '00112233445566778899aabbccddeeff'
            model = 'zhimi.heater.za2'
            name = 'Bedroom Heater'

            [poll]
            interval_secs = 15

            [logging]
            filter = 'debug'
            ",
        )
        .unwrap();
        assert_eq!(config.device.host, "192.168.1.40");
        assert_eq!(config.device.model.as_deref(), Some("zhimi.heater.za2"));
        assert_eq!(config.device.name, "Bedroom Heater");
        assert_eq!(config.poll.interval_secs, 15);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let config: Config = toml::from_str(
            "
            [poll]
            interval_secs = 5
            ",
        )
        .unwrap();
        assert_eq!(config.poll.interval_secs, 5);
        assert_eq!(config.device.name, "Mi Heater");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.poll.interval_secs, 30);
    }

    #[test]
    fn should_reject_zero_poll_interval() {
        let mut config = Config::default();
        config.poll.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_malformed_token_when_host_is_set() {
        let mut config = Config::default();
        config.device.host = "192.168.1.40".to_string();
        config.device.token = "not-a-token".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_valid_token_when_host_is_set() {
        let mut config = Config::default();
        config.device.host = "192.168.1.40".to_string();
        config.device.token = "00112233445566778899aabbccddeeff".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_not_require_token_without_host() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_convert_into_heater_config() {
        let mut config = Config::default();
        config.device.name = "Bedroom Heater".to_string();
        config.device.model = Some("zhimi.heater.mc2".to_string());
        let heater = config.heater();
        assert_eq!(heater.name, "Bedroom Heater");
        assert_eq!(heater.model.as_deref(), Some("zhimi.heater.mc2"));
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
