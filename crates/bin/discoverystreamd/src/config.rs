//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `discoverystream.toml` in the working directory. Every field has
//! a sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::collections::HashMap;

use serde::Deserialize;

use discoverystream_adapter_mqtt::MqttConfig;
use discoverystream_app::settings::BridgeSettings;
use discoverystream_domain::device::DeviceInfo;
use discoverystream_domain::entity::EntityRef;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Topic roots, publishing toggles and the entity filter.
    pub bridge: BridgeSettings,
    /// Broker connection.
    pub mqtt: MqttConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Static metadata keyed by entity id.
    pub entities: HashMap<String, EntityConfig>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Metadata for one entity that the state source does not carry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Supported-feature bitmask (lights only).
    pub supported_features: u32,
    /// Device the entity belongs to.
    pub device: Option<DeviceInfo>,
}

impl Config {
    /// Load configuration from `discoverystream.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("discoverystream.toml")?;
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
        if let Ok(val) = std::env::var("DISCOVERYSTREAM_BASE_TOPIC") {
            self.bridge.base_topic = val;
        }
        if let Ok(val) = std::env::var("DISCOVERYSTREAM_DISCOVERY_TOPIC") {
            self.bridge.discovery_topic = Some(val);
        }
        if let Ok(val) = std::env::var("DISCOVERYSTREAM_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Ok(val) = std::env::var("DISCOVERYSTREAM_MQTT_PORT")
            && let Ok(port) = val.parse()
        {
            self.mqtt.broker_port = port;
        }
        if let Ok(val) = std::env::var("DISCOVERYSTREAM_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bridge.base_topic.trim().is_empty() {
            return Err(ConfigError::Validation(
                "bridge.base_topic must not be empty".to_string(),
            ));
        }
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "mqtt.broker_port must be non-zero".to_string(),
            ));
        }
        if let Some(bad) = self
            .entities
            .keys()
            .find(|id| id.parse::<EntityRef>().is_err())
        {
            return Err(ConfigError::Validation(format!(
                "entities.{bad:?} is not a valid entity id"
            )));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "discoverystreamd=info,discoverystream_app=info,discoverystream_adapter_mqtt=info"
                .to_string(),
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
