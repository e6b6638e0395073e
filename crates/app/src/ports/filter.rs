//! Entity filter port — decides which entities are bridged.

use discoverystream_domain::entity::EntityRef;

/// Include/exclude decision for an entity. Rule syntax is up to the implementation.
pub trait EntityFilter {
    fn is_included(&self, entity: &EntityRef) -> bool;

    /// Whether an explicit include rule is configured. Sensors and binary
    /// sensors without a `device_class` are only discoverable when it is.
    fn has_includes(&self) -> bool {
        false
    }
}

impl<T: EntityFilter> EntityFilter for std::sync::Arc<T> {
    fn is_included(&self, entity: &EntityRef) -> bool {
        (**self).is_included(entity)
    }

    fn has_includes(&self) -> bool {
        (**self).has_includes()
    }
}
