//! Bridge settings — topic roots and publishing toggles.

use serde::Deserialize;

use crate::filter::FilterConfig;
use crate::topic::normalize_base;

/// Validated bridge configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Root of all state, attribute and command topics.
    pub base_topic: String,
    /// Root of discovery config topics; falls back to `base_topic`.
    pub discovery_topic: Option<String>,
    /// Publish each attribute on its own `<base>/<domain>/<object_id>/<key>` topic.
    pub publish_attributes: bool,
    /// Publish `last_updated` / `last_changed` topics.
    pub publish_timestamps: bool,
    /// Publish discovery configs, attributes and availability, and accept
    /// commands. When off, only the bare state is published.
    pub publish_discovery: bool,
    /// Include/exclude rules.
    pub filter: FilterConfig,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            base_topic: "discoverystream".to_string(),
            discovery_topic: None,
            publish_attributes: false,
            publish_timestamps: false,
            publish_discovery: true,
            filter: FilterConfig::default(),
        }
    }
}

impl BridgeSettings {
    /// Resolve both topic roots, each ending in `/`.
    #[must_use]
    pub fn roots(&self) -> TopicRoots {
        let discovery = self
            .discovery_topic
            .as_deref()
            .filter(|topic| !topic.is_empty())
            .unwrap_or(&self.base_topic);
        TopicRoots {
            base: normalize_base(&self.base_topic),
            discovery: normalize_base(discovery),
        }
    }
}

/// Normalized base and discovery topic roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRoots {
    pub base: String,
    pub discovery: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let settings = BridgeSettings::default();
        assert_eq!(settings.base_topic, "discoverystream");
        assert!(settings.discovery_topic.is_none());
        assert!(settings.publish_discovery);
        assert!(!settings.publish_attributes);
        assert!(!settings.publish_timestamps);
    }

    #[test]
    fn should_default_discovery_root_to_base_root() {
        let settings = BridgeSettings {
            base_topic: "home".to_string(),
            ..BridgeSettings::default()
        };
        let roots = settings.roots();
        assert_eq!(roots.base, "home/");
        assert_eq!(roots.discovery, "home/");
    }

    #[test]
    fn should_normalize_explicit_discovery_root() {
        let settings = BridgeSettings {
            base_topic: "home/".to_string(),
            discovery_topic: Some("homeassistant".to_string()),
            ..BridgeSettings::default()
        };
        let roots = settings.roots();
        assert_eq!(roots.base, "home/");
        assert_eq!(roots.discovery, "homeassistant/");
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            base_topic = "state"
            discovery_topic = "homeassistant"
            publish_attributes = true
            publish_timestamps = true
            publish_discovery = false

            [filter]
            include_domains = ["light", "switch"]
        "#;
        let settings: BridgeSettings = toml::from_str(toml).unwrap();
        assert_eq!(settings.base_topic, "state");
        assert!(settings.publish_attributes);
        assert!(settings.publish_timestamps);
        assert!(!settings.publish_discovery);
        assert_eq!(settings.filter.include_domains, vec!["light", "switch"]);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let settings: BridgeSettings = toml::from_str(r#"base_topic = "x""#).unwrap();
        assert!(settings.publish_discovery);
        assert!(settings.filter.exclude_domains.is_empty());
    }
}
