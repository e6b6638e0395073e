//! Include/exclude entity filter driven by configuration.

use std::collections::HashSet;

use serde::Deserialize;

use discoverystream_domain::entity::EntityRef;

use crate::ports::EntityFilter;

/// Include/exclude lists, by domain or by full entity id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub include_domains: Vec<String>,
    pub include_entities: Vec<String>,
    pub exclude_domains: Vec<String>,
    pub exclude_entities: Vec<String>,
}

/// [`EntityFilter`] built from a [`FilterConfig`].
///
/// Exclusions always win. When any include list is non-empty, only listed
/// entities (or entities of listed domains) pass; otherwise everything
/// not excluded passes.
#[derive(Debug, Clone, Default)]
pub struct IncludeExcludeFilter {
    include_domains: HashSet<String>,
    include_entities: HashSet<String>,
    exclude_domains: HashSet<String>,
    exclude_entities: HashSet<String>,
}

impl IncludeExcludeFilter {
    #[must_use]
    pub fn new(config: &FilterConfig) -> Self {
        let set = |items: &[String]| items.iter().cloned().collect::<HashSet<_>>();
        Self {
            include_domains: set(&config.include_domains),
            include_entities: set(&config.include_entities),
            exclude_domains: set(&config.exclude_domains),
            exclude_entities: set(&config.exclude_entities),
        }
    }
}

impl EntityFilter for IncludeExcludeFilter {
    fn is_included(&self, entity: &EntityRef) -> bool {
        let entity_id = entity.entity_id();
        if self.exclude_entities.contains(&entity_id)
            || self.exclude_domains.contains(entity.domain())
        {
            return false;
        }
        if !self.has_includes() {
            return true;
        }
        self.include_entities.contains(&entity_id)
            || self.include_domains.contains(entity.domain())
    }

    fn has_includes(&self) -> bool {
        !self.include_domains.is_empty() || !self.include_entities.is_empty()
    }
}
