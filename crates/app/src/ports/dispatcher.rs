//! Action dispatcher port — executes decoded control actions.

use std::future::Future;

use discoverystream_domain::action::ActionRequest;
use discoverystream_domain::error::BridgeError;

/// Accepts typed action requests (e.g. `light.turn_on`) for execution.
///
/// Fire-and-forget from the bridge's point of view: a returned error is
/// logged, never retried.
pub trait ActionDispatcher {
    fn invoke(
        &self,
        request: ActionRequest,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: ActionDispatcher + Send + Sync> ActionDispatcher for std::sync::Arc<T> {
    fn invoke(
        &self,
        request: ActionRequest,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).invoke(request)
    }
}
