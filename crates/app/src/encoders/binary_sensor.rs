//! Binary sensor — read-only on/off entity.

use discoverystream_domain::discovery::DiscoveryConfig;
use discoverystream_domain::entity::StateSnapshot;
use discoverystream_domain::error::EncodeError;

use super::{EncodeContext, Encoder, base_config, include_or_device_class};

/// Discoverable only with a `device_class` or an active include filter.
/// The on/off payloads match the published state values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinarySensorEncoder;

impl Encoder for BinarySensorEncoder {
    fn is_eligible(&self, snapshot: &StateSnapshot, ctx: &EncodeContext) -> bool {
        include_or_device_class(snapshot, ctx)
    }

    fn discovery_config(
        &self,
        snapshot: &StateSnapshot,
        ctx: &EncodeContext,
    ) -> Result<DiscoveryConfig, EncodeError> {
        let mut config = base_config(snapshot, ctx);
        config.payload_on = Some("on".to_string());
        config.payload_off = Some("off".to_string());
        Ok(config)
    }
}
