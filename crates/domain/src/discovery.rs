//! Discovery config — the retained document that tells an MQTT dashboard
//! how to render and control one entity.
//!
//! Field names follow the abbreviated keys of the MQTT discovery protocol
//! (`uniq_id`, `stat_t`, `avty_t`, …). Optional fields are omitted from the
//! serialized document rather than sent as `null`.

use serde::Serialize;
use serde_json::Value;

use crate::device::DeviceInfo;
use crate::entity::EntityRef;

/// A discovery config for a single entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryConfig {
    #[serde(rename = "uniq_id")]
    pub unique_id: String,
    pub name: String,
    #[serde(rename = "stat_t")]
    pub state_topic: String,
    #[serde(rename = "json_attr_t", skip_serializing_if = "Option::is_none")]
    pub json_attributes_topic: Option<String>,
    #[serde(rename = "avty_t")]
    pub availability_topic: String,
    #[serde(rename = "dev_cla", skip_serializing_if = "Option::is_none")]
    pub device_class: Option<Value>,
    #[serde(rename = "unit_of_meas", skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<Value>,
    #[serde(rename = "stat_cla", skip_serializing_if = "Option::is_none")]
    pub state_class: Option<Value>,
    #[serde(rename = "pl_on", skip_serializing_if = "Option::is_none")]
    pub payload_on: Option<String>,
    #[serde(rename = "pl_off", skip_serializing_if = "Option::is_none")]
    pub payload_off: Option<String>,
    #[serde(rename = "stat_on", skip_serializing_if = "Option::is_none")]
    pub state_on: Option<String>,
    #[serde(rename = "stat_off", skip_serializing_if = "Option::is_none")]
    pub state_off: Option<String>,
    #[serde(rename = "cmd_t", skip_serializing_if = "Option::is_none")]
    pub command_topic: Option<String>,
    #[serde(flatten)]
    pub climate: Option<ClimateConfig>,
    #[serde(flatten)]
    pub light: Option<LightConfig>,
    #[serde(rename = "dev", skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceLink>,
}

impl DiscoveryConfig {
    /// The fields every discovery config carries.
    ///
    /// The unique id is `mqtt_<entity_id>` and the name is derived from the
    /// object id.
    #[must_use]
    pub fn new(
        entity: &EntityRef,
        state_topic: String,
        json_attributes_topic: Option<String>,
        availability_topic: String,
    ) -> Self {
        Self {
            unique_id: format!("mqtt_{entity}"),
            name: entity.display_name(),
            state_topic,
            json_attributes_topic,
            availability_topic,
            device_class: None,
            unit_of_measurement: None,
            state_class: None,
            payload_on: None,
            payload_off: None,
            state_on: None,
            state_off: None,
            command_topic: None,
            climate: None,
            light: None,
            device: None,
        }
    }
}

/// Climate-specific discovery fields. Temperatures and the preset mode are
/// read from the JSON attributes topic through value templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateConfig {
    pub current_temperature_topic: String,
    pub current_temperature_template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Value>,
    pub max_temp: Value,
    pub min_temp: Value,
    pub modes: Value,
    pub mode_state_topic: String,
    #[serde(flatten)]
    pub presets: Option<PresetConfig>,
    pub temperature_state_topic: String,
    pub temperature_state_template: String,
}

/// Preset-mode fields of a climate config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetConfig {
    pub preset_modes: Vec<Value>,
    pub preset_mode_command_topic: String,
    pub preset_mode_state_topic: String,
    pub preset_mode_value_template: String,
}

/// Light-specific discovery fields for the JSON command schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightConfig {
    pub schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_color_modes: Option<Value>,
}

/// Device linkage block (`dev`) with abbreviated keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceLink {
    #[serde(rename = "mf", skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(rename = "mdl", skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "sw", skip_serializing_if = "Option::is_none")]
    pub sw_version: Option<String>,
    #[serde(rename = "ids", skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(rename = "cns", skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<(String, String)>,
}

impl From<&DeviceInfo> for DeviceLink {
    /// Keep only non-empty fields; identifiers keep the second element of
    /// each `(namespace, identifier)` pair.
    fn from(device: &DeviceInfo) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|s| !s.is_empty());
        Self {
            manufacturer: non_empty(&device.manufacturer),
            model: non_empty(&device.model),
            name: non_empty(&device.name),
            sw_version: non_empty(&device.sw_version),
            identifiers: device
                .identifiers
                .iter()
                .map(|(_, id)| id.clone())
                .collect(),
            connections: device.connections.clone(),
        }
    }
}
