//! Transport port — publish/subscribe against the MQTT broker.

use std::future::Future;

use discoverystream_domain::error::BridgeError;

/// MQTT delivery guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Qos {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

/// A message received on a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    #[must_use]
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Publishes payloads to, and registers subscriptions on, an MQTT broker.
///
/// Inbound messages for subscribed patterns are delivered out of band by the
/// adapter (as a stream of [`InboundMessage`]); this trait only registers
/// interest.
pub trait Transport {
    /// Publish a payload. Resolves once the broker client has accepted it,
    /// so awaiting successive calls preserves their order.
    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: Qos,
        retain: bool,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Subscribe to a topic pattern (`+`/`#` wildcards allowed).
    fn subscribe(
        &self,
        pattern: &str,
        qos: Qos,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: Transport + Send + Sync> Transport for std::sync::Arc<T> {
    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: Qos,
        retain: bool,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).publish(topic, payload, qos, retain)
    }

    fn subscribe(
        &self,
        pattern: &str,
        qos: Qos,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).subscribe(pattern, qos)
    }
}
