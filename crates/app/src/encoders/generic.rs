//! Fallback for domains without a dedicated encoder.

use discoverystream_domain::discovery::DiscoveryConfig;
use discoverystream_domain::entity::StateSnapshot;
use discoverystream_domain::error::EncodeError;

use super::{EncodeContext, Encoder, base_config};

/// Never discoverable: only state, attributes and availability are published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericEncoder;

impl Encoder for GenericEncoder {
    fn is_eligible(&self, _snapshot: &StateSnapshot, _ctx: &EncodeContext) -> bool {
        false
    }

    fn discovery_config(
        &self,
        snapshot: &StateSnapshot,
        ctx: &EncodeContext,
    ) -> Result<DiscoveryConfig, EncodeError> {
        Ok(base_config(snapshot, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::test_support::context;

    #[test]
    fn should_never_be_eligible() {
        let snapshot = StateSnapshot::builder()
            .entity_id("automation.wake_up")
            .state("on")
            .build()
            .unwrap();
        let mut ctx = context(&snapshot);
        ctx.include_filter_active = true;
        assert!(!GenericEncoder.is_eligible(&snapshot, &ctx));
    }
}
