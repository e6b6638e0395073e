//! # discoverystream-adapter-mqtt
//!
//! MQTT adapter — implements the [`Transport`] port with rumqttc.
//!
//! ## Responsibilities
//! - Own the rumqttc event loop in a background task
//! - Publish retained state payloads and discovery configs
//! - Register command subscriptions and restore them after a reconnect
//! - Forward inbound publishes as a stream of [`InboundMessage`]
//!
//! ## Dependency rule
//! Same as other adapters: depends on `discoverystream-app` and
//! `discoverystream-domain`, never the reverse.

pub mod config;
pub mod error;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Incoming, Outgoing, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

use discoverystream_app::ports::{InboundMessage, Qos, Transport};
use discoverystream_domain::error::BridgeError;

pub use config::MqttConfig;
pub use error::MqttError;

/// Stream of messages received on subscribed topics.
pub type InboundStream = ReceiverStream<InboundMessage>;

/// Subscriptions registered so far, replayed after every reconnect.
type Subscriptions = Arc<Mutex<Vec<(String, QoS)>>>;

/// rumqttc-backed [`Transport`].
///
/// Publishes are queued on the client and flushed by the event loop task,
/// in the order they were awaited.
#[derive(Clone)]
pub struct MqttTransport {
    client: AsyncClient,
    subscriptions: Subscriptions,
}

impl MqttTransport {
    /// Create the client and spawn its event loop.
    ///
    /// Returns the transport, the stream of inbound messages, and the handle
    /// of the event loop task. Connecting happens in the background; the
    /// transport can be used right away.
    #[must_use]
    pub fn connect(config: &MqttConfig) -> (Self, InboundStream, JoinHandle<()>) {
        let capacity = config.channel_capacity.max(1);
        let (client, event_loop) = AsyncClient::new(config.mqtt_options(), capacity);
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity);

        let transport = Self {
            client,
            subscriptions: Subscriptions::default(),
        };
        let driver = EventLoopDriver {
            event_loop,
            client: transport.client.clone(),
            subscriptions: Arc::clone(&transport.subscriptions),
            inbound: inbound_tx,
            reconnect_delay: config.reconnect_delay(),
            connected_once: false,
        };
        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            client_id = %config.client_id,
            "connecting to MQTT broker"
        );
        let handle = tokio::spawn(driver.run());

        (transport, ReceiverStream::new(inbound_rx), handle)
    }

    /// Send a DISCONNECT to the broker.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] if the event loop is already gone.
    pub async fn disconnect(&self) -> Result<(), MqttError> {
        self.client.disconnect().await?;
        Ok(())
    }

    fn subscriptions(&self) -> MutexGuard<'_, Vec<(String, QoS)>> {
        lock(&self.subscriptions)
    }
}

impl Transport for MqttTransport {
    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        qos: Qos,
        retain: bool,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        let client = self.client.clone();
        let topic = topic.to_string();
        async move {
            client
                .publish(topic, to_qos(qos), retain, payload)
                .await
                .map_err(|err| MqttError::from(err).into_domain())
        }
    }

    fn subscribe(
        &self,
        pattern: &str,
        qos: Qos,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        let client = self.client.clone();
        let pattern = pattern.to_string();
        let qos = to_qos(qos);
        self.subscriptions().push((pattern.clone(), qos));
        async move {
            client
                .subscribe(pattern, qos)
                .await
                .map_err(|err| MqttError::from(err).into_domain())
        }
    }
}

/// Background task polling the rumqttc event loop.
struct EventLoopDriver {
    event_loop: EventLoop,
    client: AsyncClient,
    subscriptions: Subscriptions,
    inbound: mpsc::Sender<InboundMessage>,
    reconnect_delay: Duration,
    connected_once: bool,
}

impl EventLoopDriver {
    /// Poll until the client asks to stop. rumqttc reconnects on the next
    /// poll after an error, so errors only pause the loop.
    async fn run(mut self) {
        loop {
            match self.iterate().await {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    tracing::warn!(%err, delay = ?self.reconnect_delay, "MQTT connection lost, retrying");
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
        tracing::info!("MQTT event loop stopped");
    }

    /// Handle one event. Returns `false` once DISCONNECT went out or every
    /// client handle is dropped.
    async fn iterate(&mut self) -> Result<bool, MqttError> {
        let event = match self.event_loop.poll().await {
            Ok(event) => event,
            Err(rumqttc::ConnectionError::RequestsDone) => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        match event {
            Event::Incoming(Incoming::ConnAck(_)) => {
                tracing::info!("connected to MQTT broker");
                if self.connected_once {
                    self.restore_subscriptions();
                }
                self.connected_once = true;
            }
            Event::Incoming(Incoming::Publish(publish)) => {
                let message = InboundMessage::new(publish.topic, publish.payload.to_vec());
                tracing::trace!(topic = %message.topic, "inbound MQTT message");
                if self.inbound.send(message).await.is_err() {
                    tracing::debug!("inbound consumer gone, dropping message");
                }
            }
            Event::Incoming(Incoming::Disconnect) => {
                tracing::info!("broker sent DISCONNECT");
            }
            Event::Outgoing(Outgoing::Disconnect) => return Ok(false),
            _ => {}
        }
        Ok(true)
    }

    /// Re-register every subscription after a reconnect. Uses the
    /// non-blocking API since this runs on the task that drains the queue.
    fn restore_subscriptions(&self) {
        for (pattern, qos) in lock(&self.subscriptions).iter() {
            match self.client.try_subscribe(pattern.as_str(), *qos) {
                Ok(()) => tracing::debug!(%pattern, "restored subscription"),
                Err(err) => tracing::warn!(%err, %pattern, "failed to restore subscription"),
            }
        }
    }
}

fn lock(subscriptions: &Subscriptions) -> MutexGuard<'_, Vec<(String, QoS)>> {
    subscriptions.lock().unwrap_or_else(PoisonError::into_inner)
}

fn to_qos(qos: Qos) -> QoS {
    match qos {
        Qos::AtMostOnce => QoS::AtMostOnce,
        Qos::AtLeastOnce => QoS::AtLeastOnce,
        Qos::ExactlyOnce => QoS::ExactlyOnce,
    }
}
