//! Climate — thermostats and HVAC units.
//!
//! Current/target temperature and the preset mode are not published on
//! their own topics: the config points the dashboard at the JSON attributes
//! topic with a value template for each.
//!
//! Precondition: the snapshot carries `min_temp`, `max_temp` and
//! `hvac_modes`. A snapshot without them fails with
//! [`EncodeError::MissingAttribute`].

use serde_json::Value;

use discoverystream_domain::discovery::{ClimateConfig, DiscoveryConfig, PresetConfig};
use discoverystream_domain::entity::StateSnapshot;
use discoverystream_domain::error::EncodeError;

use super::{EncodeContext, Encoder, base_config};
use crate::topic;

/// Preset entry that means "no preset" and is not offered to the dashboard.
const PRESET_NONE: &str = "none";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClimateEncoder;

impl Encoder for ClimateEncoder {
    fn discovery_config(
        &self,
        snapshot: &StateSnapshot,
        ctx: &EncodeContext,
    ) -> Result<DiscoveryConfig, EncodeError> {
        let required = |attribute: &'static str| {
            snapshot
                .attribute(attribute)
                .cloned()
                .ok_or_else(|| EncodeError::MissingAttribute {
                    entity_id: snapshot.entity.entity_id(),
                    attribute,
                })
        };

        let attributes_topic = ctx.topics.attributes();
        let presets = snapshot
            .attribute("preset_modes")
            .and_then(Value::as_array)
            .map(|modes| PresetConfig {
                preset_modes: modes
                    .iter()
                    .filter(|mode| mode.as_str() != Some(PRESET_NONE))
                    .cloned()
                    .collect(),
                preset_mode_command_topic: ctx.topics.topic(topic::PRESET_COMMAND),
                preset_mode_state_topic: attributes_topic.clone(),
                preset_mode_value_template: "{{ value_json.preset_mode }}".to_string(),
            });

        let mut config = base_config(snapshot, ctx);
        config.climate = Some(ClimateConfig {
            current_temperature_topic: attributes_topic.clone(),
            current_temperature_template: "{{ value_json.current_temperature }}".to_string(),
            icon: snapshot.attribute("icon").cloned(),
            max_temp: required("max_temp")?,
            min_temp: required("min_temp")?,
            modes: required("hvac_modes")?,
            mode_state_topic: ctx.topics.state(),
            presets,
            temperature_state_topic: attributes_topic,
            temperature_state_template: "{{ value_json.temperature }}".to_string(),
        });
        Ok(config)
    }
}
