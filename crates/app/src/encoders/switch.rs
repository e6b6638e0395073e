//! Switch — commandable on/off entity.

use discoverystream_domain::discovery::DiscoveryConfig;
use discoverystream_domain::entity::StateSnapshot;
use discoverystream_domain::error::EncodeError;

use super::{EncodeContext, Encoder, PAYLOAD_OFF, PAYLOAD_ON, base_config};
use crate::topic;

/// Always discoverable. Commands arrive on `…/set` as `ON`/`OFF`, while the
/// state topic carries the entity's own `on`/`off`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchEncoder;

impl Encoder for SwitchEncoder {
    fn discovery_config(
        &self,
        snapshot: &StateSnapshot,
        ctx: &EncodeContext,
    ) -> Result<DiscoveryConfig, EncodeError> {
        let mut config = base_config(snapshot, ctx);
        config.payload_on = Some(PAYLOAD_ON.to_string());
        config.payload_off = Some(PAYLOAD_OFF.to_string());
        config.state_on = Some("on".to_string());
        config.state_off = Some("off".to_string());
        config.command_topic = Some(ctx.topics.topic(topic::SET));
        Ok(config)
    }
}
