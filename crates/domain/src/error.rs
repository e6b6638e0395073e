//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`BridgeError`] via `#[from]` (or an `into_domain` helper for adapters).

/// Top-level error for the bridge.
///
/// None of these are fatal to the process: callers log them and carry on
/// with the next payload or notification.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("decode error")]
    Decode(#[from] DecodeError),

    #[error("encode error")]
    Encode(#[from] EncodeError),

    #[error("invalid entity id")]
    InvalidEntityId(#[from] EntityIdError),

    /// The MQTT transport rejected a publish or subscribe.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The action dispatcher could not accept a request.
    #[error("dispatch error: {0}")]
    Dispatch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// An entity identifier that is not of the form `domain.object_id`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityIdError {
    #[error("entity id {0:?} has no '.' separator")]
    MissingSeparator(String),

    #[error("entity id {0:?} has an empty domain or object id")]
    EmptySegment(String),

    /// The object id contains a `.`, which would add a topic level.
    #[error("entity id {0:?} has more than one '.' separator")]
    ExtraSeparator(String),
}

/// A malformed inbound command.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The topic does not follow `<base><domain>/<object_id>/<command>`.
    #[error("unexpected command topic {0:?}")]
    UnexpectedTopic(String),

    /// The command segment is neither `set` nor `set_light`.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    /// A `set` payload that is neither the on nor the off literal.
    #[error("invalid payload for \"set\": {0:?}")]
    InvalidSwitchPayload(String),

    /// `set_light` received on a topic whose domain is not `light`.
    #[error("invalid domain for \"set_light\": {0:?}")]
    InvalidLightDomain(String),

    /// The `set_light` payload is not valid JSON.
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The `set_light` payload is valid JSON but not an object.
    #[error("light command must be a JSON object")]
    NotAnObject,

    #[error("missing required field {0:?}")]
    MissingField(&'static str),

    /// `state` is present but is neither `ON` nor `OFF`.
    #[error("invalid light state {0}")]
    InvalidLightState(serde_json::Value),

    /// A color component is missing or not numeric.
    #[error("invalid color component {0:?}")]
    InvalidColorComponent(&'static str),

    /// The payload is not UTF-8.
    #[error("payload is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
}

/// A value that could not be turned into an outbound payload.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to serialize payload")]
    Json(#[from] serde_json::Error),

    /// A domain encoder needs an attribute the snapshot does not carry.
    #[error("required attribute {attribute:?} missing for {entity_id}")]
    MissingAttribute {
        entity_id: String,
        attribute: &'static str,
    },
}
