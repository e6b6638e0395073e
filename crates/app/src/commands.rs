//! Command decoder — inbound MQTT commands to typed action requests.
//!
//! Two command topics are understood:
//!
//! - `<base><domain>/<object_id>/set` with a plain `ON` / `OFF` payload
//! - `<base>light/<object_id>/set_light` with a JSON-schema light command
//!
//! Malformed commands are logged and dropped; they never stop the loop.

use serde_json::{Map, Value};
use tokio_stream::{Stream, StreamExt};

use discoverystream_domain::action::{ActionKind, ActionRequest};
use discoverystream_domain::color::ColorSpec;
use discoverystream_domain::entity::EntityRef;
use discoverystream_domain::error::DecodeError;

use crate::encoders::{PAYLOAD_OFF, PAYLOAD_ON};
use crate::ports::{ActionDispatcher, InboundMessage, Qos, Transport};
use crate::topic::{self, CommandTopic};

/// Longest payload prefix written to the log for a rejected command.
const PAYLOAD_EXCERPT_CHARS: usize = 128;

/// Light command fields copied verbatim on turn-on.
const LIGHT_ON_PASSTHROUGH: [&str; 2] = ["brightness", "color_temp"];

/// Field copied for both turn-on and turn-off.
const TRANSITION: &str = "transition";

/// Pure decoder for command topics under one base topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDecoder {
    base: String,
}

impl CommandDecoder {
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self {
            base: topic::normalize_base(base),
        }
    }

    /// Decode one inbound message into an action request.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the topic is not a known command
    /// topic or the payload does not match the command's format.
    pub fn decode(&self, topic: &str, payload: &[u8]) -> Result<ActionRequest, DecodeError> {
        let CommandTopic { entity, command } = topic::parse_command_topic(&self.base, topic)?;
        let payload = std::str::from_utf8(payload)?;
        match command.as_str() {
            topic::SET => decode_set(entity, payload),
            topic::SET_LIGHT => decode_set_light(entity, payload),
            other => Err(DecodeError::UnknownCommand(other.to_string())),
        }
    }
}

fn decode_set(entity: EntityRef, payload: &str) -> Result<ActionRequest, DecodeError> {
    let action = match payload {
        PAYLOAD_ON => ActionKind::TurnOn,
        PAYLOAD_OFF => ActionKind::TurnOff,
        other => return Err(DecodeError::InvalidSwitchPayload(other.to_string())),
    };
    Ok(ActionRequest::new(action, entity))
}

fn decode_set_light(entity: EntityRef, payload: &str) -> Result<ActionRequest, DecodeError> {
    if entity.domain() != "light" {
        return Err(DecodeError::InvalidLightDomain(entity.domain().to_string()));
    }
    let Value::Object(fields) = serde_json::from_str::<Value>(payload)? else {
        return Err(DecodeError::NotAnObject);
    };

    let state = fields
        .get("state")
        .ok_or(DecodeError::MissingField("state"))?;
    let action = match state.as_str() {
        Some(PAYLOAD_ON) => ActionKind::TurnOn,
        Some(PAYLOAD_OFF) => ActionKind::TurnOff,
        _ => return Err(DecodeError::InvalidLightState(state.clone())),
    };

    let mut request = ActionRequest::new(action, entity);
    if let Some(transition) = fields.get(TRANSITION) {
        request = request.with_parameter(TRANSITION, transition.clone());
    }
    if action == ActionKind::TurnOn {
        add_turn_on_parameters(&mut request, &fields)?;
    }
    Ok(request)
}

fn add_turn_on_parameters(
    request: &mut ActionRequest,
    fields: &Map<String, Value>,
) -> Result<(), DecodeError> {
    for key in LIGHT_ON_PASSTHROUGH {
        if let Some(value) = fields.get(key) {
            request.parameters.insert(key.to_string(), value.clone());
        }
    }
    if let Some(color) = fields.get("color") {
        let color = color
            .as_object()
            .ok_or(DecodeError::InvalidColorComponent("color"))?;
        if let Some(spec) = ColorSpec::from_command(color)? {
            let (key, value) = spec.action_parameter();
            request.parameters.insert(key.to_string(), value);
        }
    }
    Ok(())
}

/// Inbound half of the bridge: decodes messages and forwards the resulting
/// actions to the dispatcher.
pub struct CommandHandler<A> {
    decoder: CommandDecoder,
    dispatcher: A,
}

impl<A: ActionDispatcher> CommandHandler<A> {
    pub fn new(decoder: CommandDecoder, dispatcher: A) -> Self {
        Self {
            decoder,
            dispatcher,
        }
    }

    /// Consume inbound messages until the stream ends.
    pub async fn run<S>(&self, mut messages: S)
    where
        S: Stream<Item = InboundMessage> + Unpin,
    {
        while let Some(message) = messages.next().await {
            self.handle(&message).await;
        }
        tracing::debug!("command stream closed, handler stopping");
    }

    /// Decode and dispatch one message. Returns whether an action was
    /// dispatched successfully.
    pub async fn handle(&self, message: &InboundMessage) -> bool {
        let request = match self.decoder.decode(&message.topic, &message.payload) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(
                    %err,
                    topic = %message.topic,
                    payload = %excerpt(&message.payload),
                    "dropping malformed command"
                );
                return false;
            }
        };

        tracing::debug!(
            entity_id = %request.target,
            action = %request.action,
            "dispatching command"
        );
        let target = request.target.clone();
        match self.dispatcher.invoke(request).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, entity_id = %target, topic = %message.topic, "dispatch failed");
                false
            }
        }
    }
}

/// Subscribe to the switch and light command topics under `base`.
///
/// A failure is logged and reported as `false`; state publishing does not
/// depend on it.
pub async fn subscribe_commands<T: Transport>(transport: &T, base: &str) -> bool {
    let base = topic::normalize_base(base);
    let patterns = [
        topic::command_pattern(&base, "switch", topic::SET),
        topic::command_pattern(&base, "light", topic::SET_LIGHT),
    ];
    for pattern in &patterns {
        if let Err(err) = transport.subscribe(pattern, Qos::AtLeastOnce).await {
            tracing::warn!(%err, %pattern, "MQTT not ready, continuing in publish-only mode");
            return false;
        }
        tracing::info!(%pattern, "subscribed to commands");
    }
    true
}

fn excerpt(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload)
        .chars()
        .take(PAYLOAD_EXCERPT_CHARS)
        .collect()
}
