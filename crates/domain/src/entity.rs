//! Entity — an addressable, observable/controllable object identified by
//! `domain.object_id` (e.g. `light.kitchen`, `sensor.outdoor_temperature`).

mod availability;
mod snapshot;

pub use availability::{Availability, STATE_UNAVAILABLE, STATE_UNKNOWN};
pub use snapshot::{STATE_ON, StateSnapshot, StateSnapshotBuilder};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EntityIdError;

/// Parsed `domain.object_id` identifier.
///
/// Immutable once parsed. Exactly one `.` separates the two parts, so the
/// topic path `domain/object_id` always has two segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityRef {
    domain: String,
    object_id: String,
}

impl EntityRef {
    /// Build a reference from its two parts.
    ///
    /// # Errors
    ///
    /// Returns [`EntityIdError::EmptySegment`] if either part is empty, or
    /// [`EntityIdError::ExtraSeparator`] if either part contains a `.`.
    pub fn new(
        domain: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Result<Self, EntityIdError> {
        let domain = domain.into();
        let object_id = object_id.into();
        check_segments(&domain, &object_id, || format!("{domain}.{object_id}"))?;
        Ok(Self { domain, object_id })
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// The full `domain.object_id` string.
    #[must_use]
    pub fn entity_id(&self) -> String {
        self.to_string()
    }

    /// The entity id with `.` replaced by `/`, as used in topic paths.
    #[must_use]
    pub fn topic_path(&self) -> String {
        format!("{}/{}", self.domain, self.object_id)
    }

    /// Human-readable name derived from the object id: underscores become
    /// spaces and every word is title-cased (`living_room` → `Living Room`).
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut name = String::with_capacity(self.object_id.len());
        let mut previous_is_letter = false;
        for ch in self.object_id.chars() {
            let ch = if ch == '_' { ' ' } else { ch };
            if ch.is_alphabetic() {
                if previous_is_letter {
                    name.extend(ch.to_lowercase());
                } else {
                    name.extend(ch.to_uppercase());
                }
                previous_is_letter = true;
            } else {
                name.push(ch);
                previous_is_letter = false;
            }
        }
        name
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.object_id)
    }
}

impl FromStr for EntityRef {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, object_id) = s
            .split_once('.')
            .ok_or_else(|| EntityIdError::MissingSeparator(s.to_string()))?;
        check_segments(domain, object_id, || s.to_string())?;
        Ok(Self {
            domain: domain.to_string(),
            object_id: object_id.to_string(),
        })
    }
}

fn check_segments(
    domain: &str,
    object_id: &str,
    entity_id: impl Fn() -> String,
) -> Result<(), EntityIdError> {
    if domain.is_empty() || object_id.is_empty() {
        return Err(EntityIdError::EmptySegment(entity_id()));
    }
    if domain.contains('.') || object_id.contains('.') {
        return Err(EntityIdError::ExtraSeparator(entity_id()));
    }
    Ok(())
}

impl TryFrom<String> for EntityRef {
    type Error = EntityIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityRef> for String {
    fn from(value: EntityRef) -> Self {
        value.to_string()
    }
}
