//! Publication registry — which entities already have a discovery config.
//!
//! Keyed by discovery-topic root, then entity id. Lives for the process
//! lifetime, grows monotonically and is never persisted: a restart starts
//! from an empty registry and republishes every config once.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use discoverystream_domain::entity::EntityRef;

/// Process-wide set of `(discovery root, entity)` pairs already published.
///
/// [`mark_published`](Self::mark_published) is an atomic check-and-set, so
/// two concurrent notifications for the same entity cannot both win.
#[derive(Debug, Default)]
pub struct PublicationRegistry {
    published: Mutex<HashMap<String, HashSet<EntityRef>>>,
}

impl PublicationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a discovery config for `entity` was already published under `root`.
    #[must_use]
    pub fn has(&self, root: &str, entity: &EntityRef) -> bool {
        self.lock()
            .get(root)
            .is_some_and(|entities| entities.contains(entity))
    }

    /// Record `entity` as published under `root`.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// entity was already recorded.
    pub fn mark_published(&self, root: &str, entity: &EntityRef) -> bool {
        self.lock()
            .entry(root.to_string())
            .or_default()
            .insert(entity.clone())
    }

    /// Number of entities recorded under `root`.
    #[must_use]
    pub fn len(&self, root: &str) -> usize {
        self.lock().get(root).map_or(0, HashSet::len)
    }

    #[must_use]
    pub fn is_empty(&self, root: &str) -> bool {
        self.len(root) == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, HashSet<EntityRef>>> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
