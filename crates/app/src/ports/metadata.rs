//! Metadata ports — device linkage and supported-feature lookups.

use discoverystream_domain::device::DeviceInfo;
use discoverystream_domain::entity::EntityRef;

/// Resolves the device an entity belongs to.
pub trait DeviceRegistry {
    /// `None` when the entity is not linked to a device.
    fn lookup_device(&self, entity: &EntityRef) -> Option<DeviceInfo>;
}

/// Resolves the supported-feature bitmask of an entity.
///
/// Only consulted for lights.
pub trait FeatureFlags {
    fn supported_features(&self, entity: &EntityRef) -> u32;
}

impl<T: DeviceRegistry> DeviceRegistry for std::sync::Arc<T> {
    fn lookup_device(&self, entity: &EntityRef) -> Option<DeviceInfo> {
        (**self).lookup_device(entity)
    }
}

impl<T: FeatureFlags> FeatureFlags for std::sync::Arc<T> {
    fn supported_features(&self, entity: &EntityRef) -> u32 {
        (**self).supported_features(entity)
    }
}
