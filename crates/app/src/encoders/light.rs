//! Light — JSON-schema light with brightness, effects and colors.

use serde_json::{Map, Value, json};

use discoverystream_domain::color::ColorSpec;
use discoverystream_domain::discovery::{DiscoveryConfig, LightConfig};
use discoverystream_domain::entity::StateSnapshot;
use discoverystream_domain::error::EncodeError;

use super::{EncodeContext, Encoder, PAYLOAD_OFF, PAYLOAD_ON, StatePayload, base_config};
use crate::topic;

/// Supported-feature bit: the light can be dimmed.
pub const SUPPORT_BRIGHTNESS: u32 = 1;
/// Supported-feature bit: the light has effects.
pub const SUPPORT_EFFECT: u32 = 4;

/// Attributes copied verbatim into the JSON state payload.
const PASSTHROUGH_ATTRIBUTES: [&str; 4] = ["brightness", "color_mode", "color_temp", "effect"];

/// Lights use the JSON schema: one `state` document in, one `set_light`
/// document out. No separate attributes topic is advertised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightEncoder;

impl Encoder for LightEncoder {
    fn discovery_config(
        &self,
        snapshot: &StateSnapshot,
        ctx: &EncodeContext,
    ) -> Result<DiscoveryConfig, EncodeError> {
        let mut config = base_config(snapshot, ctx);
        config.json_attributes_topic = None;
        config.command_topic = Some(ctx.topics.topic(topic::SET_LIGHT));

        let flag = |bit: u32| (ctx.supported_features & bit != 0).then_some(true);
        let supported_color_modes = snapshot.attribute("supported_color_modes").cloned();
        config.light = Some(LightConfig {
            schema: "json".to_string(),
            brightness: flag(SUPPORT_BRIGHTNESS),
            effect: flag(SUPPORT_EFFECT),
            color_mode: supported_color_modes.as_ref().map(|_| true),
            supported_color_modes,
        });
        Ok(config)
    }

    fn state_payloads(&self, snapshot: &StateSnapshot) -> Vec<StatePayload> {
        vec![StatePayload::new(
            topic::STATE,
            topic::encode_json(&state_document(snapshot)),
        )]
    }
}

fn state_document(snapshot: &StateSnapshot) -> Value {
    let mut document = Map::new();
    let state = if snapshot.is_on() {
        PAYLOAD_ON
    } else {
        PAYLOAD_OFF
    };
    document.insert("state".to_string(), json!(state));

    for key in PASSTHROUGH_ATTRIBUTES {
        if let Some(value) = snapshot.attribute(key) {
            document.insert(key.to_string(), value.clone());
        }
    }

    let mut color = Map::new();
    for spec in ColorSpec::from_attributes(|key| snapshot.attribute(key)) {
        spec.write_state_fields(&mut color);
    }
    if !color.is_empty() {
        document.insert("color".to_string(), Value::Object(color));
    }

    Value::Object(document)
}
