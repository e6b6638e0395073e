//! Action request — a decoded inbound command, ready for the dispatcher.
//!
//! Examples: `switch.turn_on` for `switch.kitchen`, `light.turn_on` with
//! `{"brightness": 120}` for `light.lamp`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::EntityRef;

/// The service invoked on the target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    TurnOn,
    TurnOff,
}

impl ActionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed control action produced by the command decoder.
///
/// Transient: created per inbound message, handed to the dispatcher, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub domain: String,
    pub action: ActionKind,
    pub target: EntityRef,
    pub parameters: Map<String, Value>,
}

impl ActionRequest {
    /// An action without parameters whose domain is the target's domain.
    #[must_use]
    pub fn new(action: ActionKind, target: EntityRef) -> Self {
        Self {
            domain: target.domain().to_string(),
            action,
            target,
            parameters: Map::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }
}
