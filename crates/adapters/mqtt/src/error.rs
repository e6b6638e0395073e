//! MQTT adapter error types.

use discoverystream_domain::error::BridgeError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc request queue rejected a publish or subscribe, usually
    /// because the event loop is gone.
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),

    /// The connection to the broker failed or dropped.
    #[error("MQTT connection error: {0}")]
    Connection(#[from] rumqttc::ConnectionError),
}

impl MqttError {
    /// Convert into a [`BridgeError::Transport`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> BridgeError {
        BridgeError::Transport(Box::new(self))
    }
}

impl From<MqttError> for BridgeError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
