//! Entity metadata from the `[entities]` config section.

use std::collections::HashMap;

use discoverystream_app::ports::{DeviceRegistry, FeatureFlags};
use discoverystream_domain::device::DeviceInfo;
use discoverystream_domain::entity::EntityRef;
use discoverystream_domain::error::EntityIdError;

use crate::config::EntityConfig;

/// Device registry and feature flags backed by static configuration.
/// Entities without an entry have no device and no features.
#[derive(Debug, Default)]
pub struct StaticMetadata {
    entities: HashMap<EntityRef, EntityConfig>,
}

impl StaticMetadata {
    /// # Errors
    ///
    /// Returns [`EntityIdError`] if a key is not a valid entity id.
    pub fn from_config(entities: &HashMap<String, EntityConfig>) -> Result<Self, EntityIdError> {
        let entities = entities
            .iter()
            .map(|(id, entry)| Ok((id.parse::<EntityRef>()?, entry.clone())))
            .collect::<Result<_, EntityIdError>>()?;
        Ok(Self { entities })
    }
}

impl DeviceRegistry for StaticMetadata {
    fn lookup_device(&self, entity: &EntityRef) -> Option<DeviceInfo> {
        self.entities.get(entity)?.device.clone()
    }
}

impl FeatureFlags for StaticMetadata {
    fn supported_features(&self, entity: &EntityRef) -> u32 {
        self.entities
            .get(entity)
            .map_or(0, |entry| entry.supported_features)
    }
}
