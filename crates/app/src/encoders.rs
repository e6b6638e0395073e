//! Domain encoders — one strategy per entity domain.
//!
//! Each encoder knows three things about its domain:
//!
//! 1. whether an entity may ever get a discovery config (eligibility),
//! 2. how to build that config,
//! 3. which state/attribute payloads to publish for a snapshot.
//!
//! [`DomainEncoder`] is the closed dispatch over the supported domains, with
//! [`GenericEncoder`] as the fallback for every other domain.

mod binary_sensor;
mod climate;
mod device_tracker;
mod generic;
mod light;
mod sensor;
mod switch;

pub use binary_sensor::BinarySensorEncoder;
pub use climate::ClimateEncoder;
pub use device_tracker::DeviceTrackerEncoder;
pub use generic::GenericEncoder;
pub use light::{LightEncoder, SUPPORT_BRIGHTNESS, SUPPORT_EFFECT};
pub use sensor::SensorEncoder;
pub use switch::SwitchEncoder;

use discoverystream_domain::device::DeviceInfo;
use discoverystream_domain::discovery::{DeviceLink, DiscoveryConfig};
use discoverystream_domain::entity::StateSnapshot;
use discoverystream_domain::error::EncodeError;

use crate::topic::{self, EntityTopics};

/// Command payload that turns an entity on.
pub const PAYLOAD_ON: &str = "ON";
/// Command payload that turns an entity off.
pub const PAYLOAD_OFF: &str = "OFF";

/// Per-notification inputs shared by every encoder.
#[derive(Debug, Clone)]
pub struct EncodeContext {
    /// Topics of the entity under the base topic.
    pub topics: EntityTopics,
    /// Whether an explicit include rule is configured.
    pub include_filter_active: bool,
    /// Supported-feature bitmask; only resolved for lights, `0` otherwise.
    pub supported_features: u32,
}

/// One outbound payload relative to the entity's topic prefix.
#[derive(Debug)]
pub struct StatePayload {
    pub suffix: &'static str,
    pub body: Result<String, EncodeError>,
}

impl StatePayload {
    fn new(suffix: &'static str, body: Result<String, EncodeError>) -> Self {
        Self { suffix, body }
    }
}

/// Encoding strategy for one entity domain.
pub trait Encoder {
    /// Whether a discovery config may be published for this snapshot.
    fn is_eligible(&self, _snapshot: &StateSnapshot, _ctx: &EncodeContext) -> bool {
        true
    }

    /// Build the domain-specific discovery config, without device linkage.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if a required attribute is missing.
    fn discovery_config(
        &self,
        snapshot: &StateSnapshot,
        ctx: &EncodeContext,
    ) -> Result<DiscoveryConfig, EncodeError>;

    /// Ordered state/attribute payloads for a snapshot.
    fn state_payloads(&self, snapshot: &StateSnapshot) -> Vec<StatePayload> {
        vec![
            StatePayload::new(topic::STATE, Ok(plain_state(snapshot))),
            StatePayload::new(topic::ATTRIBUTES, topic::encode_json(&snapshot.attributes)),
        ]
    }
}

/// Closed dispatch over the supported entity domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainEncoder {
    Switch(SwitchEncoder),
    BinarySensor(BinarySensorEncoder),
    Sensor(SensorEncoder),
    DeviceTracker(DeviceTrackerEncoder),
    Climate(ClimateEncoder),
    Light(LightEncoder),
    Generic(GenericEncoder),
}

impl DomainEncoder {
    /// Pick the encoder for an entity domain, falling back to [`GenericEncoder`].
    #[must_use]
    pub fn for_domain(domain: &str) -> Self {
        match domain {
            "switch" => Self::Switch(SwitchEncoder),
            "binary_sensor" => Self::BinarySensor(BinarySensorEncoder),
            "sensor" => Self::Sensor(SensorEncoder),
            "device_tracker" => Self::DeviceTracker(DeviceTrackerEncoder),
            "climate" => Self::Climate(ClimateEncoder),
            "light" => Self::Light(LightEncoder),
            _ => Self::Generic(GenericEncoder),
        }
    }

    /// Whether the supported-feature bitmask must be resolved for this domain.
    #[must_use]
    pub fn uses_supported_features(&self) -> bool {
        matches!(self, Self::Light(_))
    }

    /// Build the full discovery config, linking the device when one is known.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if the domain encoder cannot build its config.
    pub fn build_discovery_config(
        &self,
        snapshot: &StateSnapshot,
        ctx: &EncodeContext,
        device: Option<&DeviceInfo>,
    ) -> Result<DiscoveryConfig, EncodeError> {
        let mut config = self.as_encoder().discovery_config(snapshot, ctx)?;
        config.device = device.map(DeviceLink::from);
        Ok(config)
    }

    fn as_encoder(&self) -> &dyn Encoder {
        match self {
            Self::Switch(e) => e,
            Self::BinarySensor(e) => e,
            Self::Sensor(e) => e,
            Self::DeviceTracker(e) => e,
            Self::Climate(e) => e,
            Self::Light(e) => e,
            Self::Generic(e) => e,
        }
    }
}

impl Encoder for DomainEncoder {
    fn is_eligible(&self, snapshot: &StateSnapshot, ctx: &EncodeContext) -> bool {
        self.as_encoder().is_eligible(snapshot, ctx)
    }

    fn discovery_config(
        &self,
        snapshot: &StateSnapshot,
        ctx: &EncodeContext,
    ) -> Result<DiscoveryConfig, EncodeError> {
        self.as_encoder().discovery_config(snapshot, ctx)
    }

    fn state_payloads(&self, snapshot: &StateSnapshot) -> Vec<StatePayload> {
        self.as_encoder().state_payloads(snapshot)
    }
}

/// The raw state string, empty when the state is absent.
///
/// Published retained, an empty payload clears the broker's retained state
/// message, so late subscribers see no state at all rather than an empty
/// one. The `offline` availability published alongside it still tells them
/// why.
#[must_use]
pub fn plain_state(snapshot: &StateSnapshot) -> String {
    snapshot.state.clone().unwrap_or_default()
}

/// Fields shared by every discovery config: ids, topics, and the
/// `device_class` / `unit_of_measurement` / `state_class` attributes.
fn base_config(snapshot: &StateSnapshot, ctx: &EncodeContext) -> DiscoveryConfig {
    let mut config = DiscoveryConfig::new(
        &snapshot.entity,
        ctx.topics.state(),
        Some(ctx.topics.attributes()),
        ctx.topics.availability(),
    );
    config.device_class = snapshot.attribute("device_class").cloned();
    config.unit_of_measurement = snapshot.attribute("unit_of_measurement").cloned();
    config.state_class = snapshot.attribute("state_class").cloned();
    config
}

/// Eligibility rule shared by sensors and binary sensors.
fn include_or_device_class(snapshot: &StateSnapshot, ctx: &EncodeContext) -> bool {
    ctx.include_filter_active || snapshot.has_attribute("device_class")
}
