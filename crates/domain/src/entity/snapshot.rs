//! State snapshot — one state-change notification for one entity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Availability, EntityRef};
use crate::error::EntityIdError;
use crate::time::Timestamp;

/// State value of an entity that is switched on.
pub const STATE_ON: &str = "on";

/// The current state and attributes of an entity, as delivered by the
/// state-change source. Never mutated by the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(rename = "entity_id")]
    pub entity: EntityRef,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
    #[serde(default)]
    pub last_changed: Option<Timestamp>,
}

impl StateSnapshot {
    /// Create a builder for constructing a [`StateSnapshot`].
    #[must_use]
    pub fn builder() -> StateSnapshotBuilder {
        StateSnapshotBuilder::default()
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    #[must_use]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state.as_deref() == Some(STATE_ON)
    }

    #[must_use]
    pub fn availability(&self) -> Availability {
        Availability::from_state(self.state.as_deref())
    }
}

/// Step-by-step builder for [`StateSnapshot`].
#[derive(Debug, Default)]
pub struct StateSnapshotBuilder {
    entity_id: Option<String>,
    state: Option<String>,
    attributes: BTreeMap<String, serde_json::Value>,
    last_updated: Option<Timestamp>,
    last_changed: Option<Timestamp>,
}

impl StateSnapshotBuilder {
    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn last_updated(mut self, ts: Timestamp) -> Self {
        self.last_updated = Some(ts);
        self
    }

    #[must_use]
    pub fn last_changed(mut self, ts: Timestamp) -> Self {
        self.last_changed = Some(ts);
        self
    }

    /// Consume the builder and return a [`StateSnapshot`].
    ///
    /// # Errors
    ///
    /// Returns an [`EntityIdError`] if the entity id is missing or is not of
    /// the form `domain.object_id`.
    pub fn build(self) -> Result<StateSnapshot, EntityIdError> {
        let entity = self.entity_id.unwrap_or_default().parse()?;
        Ok(StateSnapshot {
            entity,
            state: self.state,
            attributes: self.attributes,
            last_updated: self.last_updated,
            last_changed: self.last_changed,
        })
    }
}
