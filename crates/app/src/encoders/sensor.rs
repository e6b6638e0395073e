//! Sensor — read-only measurement.

use discoverystream_domain::discovery::DiscoveryConfig;
use discoverystream_domain::entity::StateSnapshot;
use discoverystream_domain::error::EncodeError;

use super::{EncodeContext, Encoder, base_config, include_or_device_class};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorEncoder;

impl Encoder for SensorEncoder {
    fn is_eligible(&self, snapshot: &StateSnapshot, ctx: &EncodeContext) -> bool {
        include_or_device_class(snapshot, ctx)
    }

    fn discovery_config(
        &self,
        snapshot: &StateSnapshot,
        ctx: &EncodeContext,
    ) -> Result<DiscoveryConfig, EncodeError> {
        Ok(base_config(snapshot, ctx))
    }
}
