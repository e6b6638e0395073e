//! Topic codec — entity/suffix ⇄ MQTT topic strings, values ⇄ JSON payloads.
//!
//! Layout, relative to a base topic ending in `/`:
//!
//! | Topic | Direction |
//! |-------|-----------|
//! | `<base><domain>/<object_id>/state` | out |
//! | `<base><domain>/<object_id>/attributes` | out |
//! | `<base><domain>/<object_id>/availability` | out |
//! | `<base><domain>/<object_id>/last_updated`, `…/last_changed` | out |
//! | `<base><domain>/<object_id>/set`, `…/set_light` | in |
//! | `<discovery_base><domain>/<object_id>/config` | out |

use serde::Serialize;

use discoverystream_domain::entity::EntityRef;
use discoverystream_domain::error::{DecodeError, EncodeError};

pub const STATE: &str = "state";
pub const ATTRIBUTES: &str = "attributes";
pub const AVAILABILITY: &str = "availability";
pub const LAST_UPDATED: &str = "last_updated";
pub const LAST_CHANGED: &str = "last_changed";
pub const CONFIG: &str = "config";
pub const SET: &str = "set";
pub const SET_LIGHT: &str = "set_light";
pub const PRESET_COMMAND: &str = "preset_command";

/// Append a trailing `/` unless already present.
#[must_use]
pub fn normalize_base(topic: &str) -> String {
    if topic.ends_with('/') {
        topic.to_string()
    } else {
        format!("{topic}/")
    }
}

/// `<base><domain>/<object_id>/<suffix>`. `base` must already end in `/`.
#[must_use]
pub fn entity_topic(base: &str, entity: &EntityRef, suffix: &str) -> String {
    format!("{base}{}/{suffix}", entity.topic_path())
}

/// `<discovery_base><domain>/<object_id>/config`.
#[must_use]
pub fn discovery_topic(discovery_base: &str, entity: &EntityRef) -> String {
    entity_topic(discovery_base, entity, CONFIG)
}

/// Subscription pattern matching `command` for every object of `domain`.
#[must_use]
pub fn command_pattern(base: &str, domain: &str, command: &str) -> String {
    format!("{base}{domain}/+/{command}")
}

/// Serialize a value as a JSON payload.
///
/// # Errors
///
/// Returns [`EncodeError::Json`] when the value cannot be represented as JSON.
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String, EncodeError> {
    serde_json::to_string(value).map_err(EncodeError::Json)
}

/// All topics of one entity under one base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTopics {
    prefix: String,
}

impl EntityTopics {
    #[must_use]
    pub fn new(base: &str, entity: &EntityRef) -> Self {
        Self {
            prefix: format!("{base}{}/", entity.topic_path()),
        }
    }

    #[must_use]
    pub fn topic(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.prefix)
    }

    #[must_use]
    pub fn state(&self) -> String {
        self.topic(STATE)
    }

    #[must_use]
    pub fn attributes(&self) -> String {
        self.topic(ATTRIBUTES)
    }

    #[must_use]
    pub fn availability(&self) -> String {
        self.topic(AVAILABILITY)
    }
}

/// A parsed inbound command topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTopic {
    pub entity: EntityRef,
    pub command: String,
}

/// Split `<base><domain>/<object_id>/<command>` into its parts.
///
/// # Errors
///
/// Returns [`DecodeError::UnexpectedTopic`] if the topic is outside `base`
/// or does not have exactly three segments below it.
pub fn parse_command_topic(base: &str, topic: &str) -> Result<CommandTopic, DecodeError> {
    let unexpected = || DecodeError::UnexpectedTopic(topic.to_string());
    let rest = topic.strip_prefix(base).ok_or_else(unexpected)?;
    let mut segments = rest.split('/');
    let (Some(domain), Some(object_id), Some(command), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(unexpected());
    };
    let entity = EntityRef::new(domain, object_id).map_err(|_| unexpected())?;
    Ok(CommandTopic {
        entity,
        command: command.to_string(),
    })
}
