//! Device tracker — presence (`home`/`not_home`/zone name).

use discoverystream_domain::discovery::DiscoveryConfig;
use discoverystream_domain::entity::StateSnapshot;
use discoverystream_domain::error::EncodeError;

use super::{EncodeContext, Encoder, base_config};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceTrackerEncoder;

impl Encoder for DeviceTrackerEncoder {
    fn discovery_config(
        &self,
        snapshot: &StateSnapshot,
        ctx: &EncodeContext,
    ) -> Result<DiscoveryConfig, EncodeError> {
        Ok(base_config(snapshot, ctx))
    }
}
