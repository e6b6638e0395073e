//! Discovery publisher — turns state-change notifications into retained
//! MQTT publishes.
//!
//! One notification is one publish cycle. Within a cycle, publishes are
//! awaited one after the other, so per entity the order on the wire is:
//!
//! 1. `last_updated` / `last_changed` (when timestamps are enabled)
//! 2. one topic per attribute (when attribute topics are enabled)
//! 3. the discovery config, at most once per entity and discovery root
//! 4. the domain's state payloads
//! 5. availability
//!
//! With discovery publishing disabled, steps 3 to 5 collapse into a bare
//! state publish.

use std::sync::Arc;

use tokio_stream::{Stream, StreamExt};

use discoverystream_domain::entity::{EntityRef, StateSnapshot};
use discoverystream_domain::error::EncodeError;
use discoverystream_domain::time::to_iso8601;

use crate::encoders::{DomainEncoder, EncodeContext, Encoder, plain_state};
use crate::ports::{DeviceRegistry, EntityFilter, FeatureFlags, Qos, Transport};
use crate::registry::PublicationRegistry;
use crate::settings::{BridgeSettings, TopicRoots};
use crate::topic::{self, EntityTopics};

/// Every outbound payload uses this QoS and is retained.
const PUBLISH_QOS: Qos = Qos::AtLeastOnce;

/// What a single publish cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Entity removed or rejected by the filter; nothing was published.
    Dropped,
    /// Payloads were published. `discovery` is set when this cycle sent the
    /// entity's discovery config.
    Published { discovery: bool },
}

/// Outbound half of the bridge.
pub struct DiscoveryPublisher<T, F, D, X> {
    roots: TopicRoots,
    publish_attributes: bool,
    publish_timestamps: bool,
    publish_discovery: bool,
    registry: Arc<PublicationRegistry>,
    transport: T,
    filter: F,
    devices: D,
    features: X,
}

impl<T, F, D, X> DiscoveryPublisher<T, F, D, X>
where
    T: Transport,
    F: EntityFilter,
    D: DeviceRegistry,
    X: FeatureFlags,
{
    pub fn new(
        settings: &BridgeSettings,
        registry: Arc<PublicationRegistry>,
        transport: T,
        filter: F,
        devices: D,
        features: X,
    ) -> Self {
        Self {
            roots: settings.roots(),
            publish_attributes: settings.publish_attributes,
            publish_timestamps: settings.publish_timestamps,
            publish_discovery: settings.publish_discovery,
            registry,
            transport,
            filter,
            devices,
            features,
        }
    }

    /// Consume notifications until the stream ends.
    ///
    /// Notifications are handled strictly one at a time, which keeps the
    /// per-entity publish order intact.
    pub async fn run<S>(&self, mut notifications: S)
    where
        S: Stream<Item = Option<StateSnapshot>> + Unpin,
    {
        while let Some(notification) = notifications.next().await {
            self.handle_state_change(notification.as_ref()).await;
        }
        tracing::debug!("state feed closed, publisher stopping");
    }

    /// Run one publish cycle. `None` means the entity was removed.
    ///
    /// Never fails: encode and transport errors are logged and the rest of
    /// the cycle is still attempted.
    pub async fn handle_state_change(&self, new_state: Option<&StateSnapshot>) -> CycleOutcome {
        let Some(snapshot) = new_state else {
            return CycleOutcome::Dropped;
        };
        let entity = &snapshot.entity;
        if !self.filter.is_included(entity) {
            tracing::trace!(entity_id = %entity, "entity filtered out");
            return CycleOutcome::Dropped;
        }

        let topics = EntityTopics::new(&self.roots.base, entity);

        if self.publish_timestamps {
            self.publish_timestamp_topics(snapshot, &topics).await;
        }
        if self.publish_attributes {
            for (key, value) in &snapshot.attributes {
                self.publish(entity, topics.topic(key), topic::encode_json(value))
                    .await;
            }
        }

        if !self.publish_discovery {
            self.publish(entity, topics.state(), Ok(plain_state(snapshot)))
                .await;
            return CycleOutcome::Published { discovery: false };
        }

        let encoder = DomainEncoder::for_domain(entity.domain());
        let ctx = EncodeContext {
            supported_features: if encoder.uses_supported_features() {
                self.features.supported_features(entity)
            } else {
                0
            },
            include_filter_active: self.filter.has_includes(),
            topics,
        };

        let discovery = self.publish_discovery_config(snapshot, encoder, &ctx).await;

        for payload in encoder.state_payloads(snapshot) {
            self.publish(entity, ctx.topics.topic(payload.suffix), payload.body)
                .await;
        }
        self.publish(
            entity,
            ctx.topics.availability(),
            Ok(snapshot.availability().to_string()),
        )
        .await;

        CycleOutcome::Published { discovery }
    }

    async fn publish_timestamp_topics(&self, snapshot: &StateSnapshot, topics: &EntityTopics) {
        let stamps = [
            (topic::LAST_UPDATED, snapshot.last_updated.as_ref()),
            (topic::LAST_CHANGED, snapshot.last_changed.as_ref()),
        ];
        for (suffix, stamp) in stamps {
            if let Some(stamp) = stamp {
                self.publish(&snapshot.entity, topics.topic(suffix), Ok(to_iso8601(stamp)))
                    .await;
            }
        }
    }

    /// Publish the discovery config if the entity is eligible and has none
    /// yet under the discovery root. Returns whether a config was sent.
    ///
    /// A config that fails to build leaves the entity unmarked, so the next
    /// notification tries again.
    async fn publish_discovery_config(
        &self,
        snapshot: &StateSnapshot,
        encoder: DomainEncoder,
        ctx: &EncodeContext,
    ) -> bool {
        let entity = &snapshot.entity;
        if !encoder.is_eligible(snapshot, ctx) || self.registry.has(&self.roots.discovery, entity)
        {
            return false;
        }

        let device = self.devices.lookup_device(entity);
        let body = match encoder
            .build_discovery_config(snapshot, ctx, device.as_ref())
            .and_then(|config| topic::encode_json(&config))
        {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(%err, entity_id = %entity, "cannot build discovery config");
                return false;
            }
        };

        if !self.registry.mark_published(&self.roots.discovery, entity) {
            return false;
        }
        let discovery_topic = topic::discovery_topic(&self.roots.discovery, entity);
        tracing::info!(entity_id = %entity, topic = %discovery_topic, "publishing discovery config");
        self.publish(entity, discovery_topic, Ok(body)).await;
        true
    }

    async fn publish(&self, entity: &EntityRef, topic: String, body: Result<String, EncodeError>) {
        let body = match body {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(%err, entity_id = %entity, %topic, "skipping unencodable payload");
                return;
            }
        };
        if let Err(err) = self
            .transport
            .publish(&topic, body.into_bytes(), PUBLISH_QOS, true)
            .await
        {
            tracing::warn!(%err, entity_id = %entity, %topic, "publish failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterConfig, IncludeExcludeFilter};
    use chrono::{TimeZone, Utc};
    use discoverystream_domain::device::DeviceInfo;
    use discoverystream_domain::error::BridgeError;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    // ── Spies ──────────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq)]
    struct Published {
        topic: String,
        payload: String,
        qos: Qos,
        retain: bool,
    }

    #[derive(Default)]
    struct SpyTransport {
        published: Mutex<Vec<Published>>,
        fail_topic: Option<String>,
    }

    impl SpyTransport {
        fn failing_on(topic: &str) -> Self {
            Self {
                fail_topic: Some(topic.to_string()),
                ..Self::default()
            }
        }

        fn topics(&self) -> Vec<String> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.topic.clone())
                .collect()
        }

        fn payload(&self, topic: &str) -> Option<String> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|p| p.topic == topic)
                .map(|p| p.payload.clone())
        }

        fn count(&self, topic: &str) -> usize {
            self.topics().iter().filter(|t| *t == topic).count()
        }
    }

    impl Transport for SpyTransport {
        fn publish(
            &self,
            topic: &str,
            payload: Vec<u8>,
            qos: Qos,
            retain: bool,
        ) -> impl Future<Output = Result<(), BridgeError>> + Send {
            let result = if self.fail_topic.as_deref() == Some(topic) {
                Err(BridgeError::Transport("broker went away".into()))
            } else {
                self.published.lock().unwrap().push(Published {
                    topic: topic.to_string(),
                    payload: String::from_utf8(payload).unwrap(),
                    qos,
                    retain,
                });
                Ok(())
            };
            async { result }
        }

        fn subscribe(
            &self,
            _pattern: &str,
            _qos: Qos,
        ) -> impl Future<Output = Result<(), BridgeError>> + Send {
            async { Ok(()) }
        }
    }

    #[derive(Default)]
    struct InMemoryMetadata {
        devices: HashMap<String, DeviceInfo>,
        features: HashMap<String, u32>,
    }

    impl DeviceRegistry for InMemoryMetadata {
        fn lookup_device(&self, entity: &EntityRef) -> Option<DeviceInfo> {
            self.devices.get(&entity.entity_id()).cloned()
        }
    }

    impl FeatureFlags for InMemoryMetadata {
        fn supported_features(&self, entity: &EntityRef) -> u32 {
            self.features.get(&entity.entity_id()).copied().unwrap_or(0)
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    type TestPublisher =
        DiscoveryPublisher<Arc<SpyTransport>, IncludeExcludeFilter, Arc<InMemoryMetadata>, Arc<InMemoryMetadata>>;

    fn settings() -> BridgeSettings {
        BridgeSettings {
            base_topic: "home".to_string(),
            discovery_topic: Some("homeassistant".to_string()),
            ..BridgeSettings::default()
        }
    }

    fn publisher_with(
        settings: &BridgeSettings,
        transport: Arc<SpyTransport>,
        metadata: InMemoryMetadata,
    ) -> TestPublisher {
        let metadata = Arc::new(metadata);
        DiscoveryPublisher::new(
            settings,
            Arc::new(PublicationRegistry::new()),
            transport,
            IncludeExcludeFilter::new(&settings.filter),
            Arc::clone(&metadata),
            metadata,
        )
    }

    fn publisher(transport: Arc<SpyTransport>) -> TestPublisher {
        publisher_with(&settings(), transport, InMemoryMetadata::default())
    }

    fn switch(state: &str) -> StateSnapshot {
        StateSnapshot::builder()
            .entity_id("switch.kitchen")
            .state(state)
            .attribute("friendly_name", json!("Kitchen"))
            .build()
            .unwrap()
    }

    fn json_payload(transport: &SpyTransport, topic: &str) -> Value {
        serde_json::from_str(&transport.payload(topic).unwrap()).unwrap()
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_publish_discovery_state_attributes_then_availability() {
        let transport = Arc::new(SpyTransport::default());
        let publisher = publisher(Arc::clone(&transport));

        let outcome = publisher.handle_state_change(Some(&switch("on"))).await;

        assert_eq!(outcome, CycleOutcome::Published { discovery: true });
        assert_eq!(
            transport.topics(),
            vec![
                "homeassistant/switch/kitchen/config",
                "home/switch/kitchen/state",
                "home/switch/kitchen/attributes",
                "home/switch/kitchen/availability",
            ]
        );
        assert_eq!(transport.payload("home/switch/kitchen/state").unwrap(), "on");
        assert_eq!(
            transport.payload("home/switch/kitchen/availability").unwrap(),
            "online"
        );
    }

    #[tokio::test]
    async fn should_retain_every_publish_with_at_least_once() {
        let transport = Arc::new(SpyTransport::default());
        let publisher = publisher(Arc::clone(&transport));

        publisher.handle_state_change(Some(&switch("on"))).await;

        for published in transport.published.lock().unwrap().iter() {
            assert!(published.retain, "{} not retained", published.topic);
            assert_eq!(published.qos, Qos::AtLeastOnce);
        }
    }

    #[tokio::test]
    async fn should_publish_discovery_config_exactly_once() {
        let transport = Arc::new(SpyTransport::default());
        let publisher = publisher(Arc::clone(&transport));

        for state in ["on", "off", "on"] {
            publisher.handle_state_change(Some(&switch(state))).await;
        }

        assert_eq!(transport.count("homeassistant/switch/kitchen/config"), 1);
        assert_eq!(transport.count("home/switch/kitchen/state"), 3);
        assert_eq!(transport.payload("home/switch/kitchen/state").unwrap(), "on");
    }

    #[tokio::test]
    async fn should_encode_switch_config_with_command_topic() {
        let transport = Arc::new(SpyTransport::default());
        let publisher = publisher(Arc::clone(&transport));

        publisher.handle_state_change(Some(&switch("on"))).await;

        let config = json_payload(&transport, "homeassistant/switch/kitchen/config");
        assert_eq!(config["uniq_id"], json!("mqtt_switch.kitchen"));
        assert_eq!(config["name"], json!("Kitchen"));
        assert_eq!(config["stat_t"], json!("home/switch/kitchen/state"));
        assert_eq!(config["json_attr_t"], json!("home/switch/kitchen/attributes"));
        assert_eq!(config["avty_t"], json!("home/switch/kitchen/availability"));
        assert_eq!(config["cmd_t"], json!("home/switch/kitchen/set"));
    }

    #[tokio::test]
    async fn should_skip_discovery_for_sensor_without_device_class() {
        let transport = Arc::new(SpyTransport::default());
        let publisher = publisher(Arc::clone(&transport));
        let snapshot = StateSnapshot::builder()
            .entity_id("sensor.humidity")
            .state("40")
            .build()
            .unwrap();

        let outcome = publisher.handle_state_change(Some(&snapshot)).await;

        assert_eq!(outcome, CycleOutcome::Published { discovery: false });
        assert_eq!(transport.count("homeassistant/sensor/humidity/config"), 0);
        assert_eq!(transport.payload("home/sensor/humidity/state").unwrap(), "40");
        assert_eq!(
            transport.payload("home/sensor/humidity/availability").unwrap(),
            "online"
        );
    }

    #[tokio::test]
    async fn should_never_publish_config_for_plain_binary_sensor() {
        let transport = Arc::new(SpyTransport::default());
        let publisher = publisher(Arc::clone(&transport));

        for state in ["off", "on", "off", "on", "unavailable"] {
            let snapshot = StateSnapshot::builder()
                .entity_id("binary_sensor.hallway_motion")
                .state(state)
                .attribute("friendly_name", json!("Hallway motion"))
                .build()
                .unwrap();
            let outcome = publisher.handle_state_change(Some(&snapshot)).await;
            assert_eq!(outcome, CycleOutcome::Published { discovery: false });
        }

        assert_eq!(
            transport.count("homeassistant/binary_sensor/hallway_motion/config"),
            0
        );
        assert_eq!(
            transport.count("home/binary_sensor/hallway_motion/state"),
            5
        );
        assert_eq!(
            transport
                .payload("home/binary_sensor/hallway_motion/availability")
                .unwrap(),
            "offline"
        );
    }

    #[tokio::test]
    async fn should_keep_skipping_sensor_discovery_across_notifications() {
        let transport = Arc::new(SpyTransport::default());
        let publisher = publisher(Arc::clone(&transport));

        for reading in ["40", "41", "42"] {
            let snapshot = StateSnapshot::builder()
                .entity_id("sensor.humidity")
                .state(reading)
                .attribute("unit_of_measurement", json!("%"))
                .build()
                .unwrap();
            publisher.handle_state_change(Some(&snapshot)).await;
        }

        assert_eq!(transport.count("homeassistant/sensor/humidity/config"), 0);
        assert_eq!(transport.payload("home/sensor/humidity/state").unwrap(), "42");
    }

    #[tokio::test]
    async fn should_make_sensor_eligible_when_include_filter_is_active() {
        let transport = Arc::new(SpyTransport::default());
        let mut settings = settings();
        settings.filter = FilterConfig {
            include_domains: vec!["sensor".to_string()],
            ..FilterConfig::default()
        };
        let publisher = publisher_with(&settings, Arc::clone(&transport), InMemoryMetadata::default());
        let snapshot = StateSnapshot::builder()
            .entity_id("sensor.humidity")
            .state("40")
            .build()
            .unwrap();

        let outcome = publisher.handle_state_change(Some(&snapshot)).await;

        assert_eq!(outcome, CycleOutcome::Published { discovery: true });
    }

    #[tokio::test]
    async fn should_drop_removed_and_filtered_entities() {
        let transport = Arc::new(SpyTransport::default());
        let mut settings = settings();
        settings.filter.exclude_entities = vec!["switch.kitchen".to_string()];
        let publisher = publisher_with(&settings, Arc::clone(&transport), InMemoryMetadata::default());

        assert_eq!(publisher.handle_state_change(None).await, CycleOutcome::Dropped);
        assert_eq!(
            publisher.handle_state_change(Some(&switch("on"))).await,
            CycleOutcome::Dropped
        );
        assert!(transport.topics().is_empty());
    }

    #[tokio::test]
    async fn should_derive_availability_from_state() {
        let cases = [
            (Some("on"), "online"),
            (Some("unavailable"), "offline"),
            (Some("unknown"), "offline"),
            (None, "offline"),
        ];
        for (state, expected) in cases {
            let transport = Arc::new(SpyTransport::default());
            let publisher = publisher(Arc::clone(&transport));
            let mut snapshot = switch("on");
            snapshot.state = state.map(ToString::to_string);

            publisher.handle_state_change(Some(&snapshot)).await;

            assert_eq!(
                transport.payload("home/switch/kitchen/availability").unwrap(),
                expected,
                "state {state:?}"
            );
        }
    }

    #[tokio::test]
    async fn should_publish_absent_state_as_empty_retained_payload() {
        let transport = Arc::new(SpyTransport::default());
        let publisher = publisher(Arc::clone(&transport));
        let mut snapshot = switch("on");
        snapshot.state = None;

        publisher.handle_state_change(Some(&snapshot)).await;

        let published = transport.published.lock().unwrap();
        let state = published
            .iter()
            .find(|p| p.topic == "home/switch/kitchen/state")
            .unwrap();
        assert_eq!(state.payload, "");
        assert!(state.retain);
        let availability = published.last().unwrap();
        assert_eq!(availability.topic, "home/switch/kitchen/availability");
        assert_eq!(availability.payload, "offline");
    }

    #[tokio::test]
    async fn should_publish_only_bare_state_when_discovery_disabled() {
        let transport = Arc::new(SpyTransport::default());
        let mut settings = settings();
        settings.publish_discovery = false;
        let publisher = publisher_with(&settings, Arc::clone(&transport), InMemoryMetadata::default());

        let outcome = publisher.handle_state_change(Some(&switch("off"))).await;

        assert_eq!(outcome, CycleOutcome::Published { discovery: false });
        assert_eq!(transport.topics(), vec!["home/switch/kitchen/state"]);
        assert_eq!(transport.payload("home/switch/kitchen/state").unwrap(), "off");
    }

    #[tokio::test]
    async fn should_publish_timestamps_first_even_without_discovery() {
        let transport = Arc::new(SpyTransport::default());
        let mut settings = settings();
        settings.publish_discovery = false;
        settings.publish_timestamps = true;
        let publisher = publisher_with(&settings, Arc::clone(&transport), InMemoryMetadata::default());
        let mut snapshot = switch("on");
        snapshot.last_updated = Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap());
        snapshot.last_changed = Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());

        publisher.handle_state_change(Some(&snapshot)).await;

        assert_eq!(
            transport.topics(),
            vec![
                "home/switch/kitchen/last_updated",
                "home/switch/kitchen/last_changed",
                "home/switch/kitchen/state",
            ]
        );
        assert_eq!(
            transport.payload("home/switch/kitchen/last_updated").unwrap(),
            "2024-03-01T12:30:05+00:00"
        );
    }

    #[tokio::test]
    async fn should_publish_each_attribute_before_discovery() {
        let transport = Arc::new(SpyTransport::default());
        let mut settings = settings();
        settings.publish_attributes = true;
        let publisher = publisher_with(&settings, Arc::clone(&transport), InMemoryMetadata::default());

        publisher.handle_state_change(Some(&switch("on"))).await;

        let topics = transport.topics();
        assert_eq!(topics[0], "home/switch/kitchen/friendly_name");
        assert_eq!(topics[1], "homeassistant/switch/kitchen/config");
        assert_eq!(
            transport.payload("home/switch/kitchen/friendly_name").unwrap(),
            "\"Kitchen\""
        );
    }

    #[tokio::test]
    async fn should_retry_climate_discovery_once_attributes_arrive() {
        let transport = Arc::new(SpyTransport::default());
        let publisher = publisher(Arc::clone(&transport));
        let incomplete = StateSnapshot::builder()
            .entity_id("climate.hallway")
            .state("heat")
            .build()
            .unwrap();

        let outcome = publisher.handle_state_change(Some(&incomplete)).await;

        assert_eq!(outcome, CycleOutcome::Published { discovery: false });
        assert_eq!(transport.count("homeassistant/climate/hallway/config"), 0);
        assert_eq!(transport.payload("home/climate/hallway/state").unwrap(), "heat");

        let complete = StateSnapshot::builder()
            .entity_id("climate.hallway")
            .state("heat")
            .attribute("min_temp", json!(7))
            .attribute("max_temp", json!(35))
            .attribute("hvac_modes", json!(["off", "heat"]))
            .build()
            .unwrap();
        let outcome = publisher.handle_state_change(Some(&complete)).await;

        assert_eq!(outcome, CycleOutcome::Published { discovery: true });
    }

    #[tokio::test]
    async fn should_publish_light_state_as_json_without_attributes_topic() {
        let transport = Arc::new(SpyTransport::default());
        let metadata = InMemoryMetadata {
            features: HashMap::from([("light.desk_lamp".to_string(), 1)]),
            ..InMemoryMetadata::default()
        };
        let publisher = publisher_with(&settings(), Arc::clone(&transport), metadata);
        let snapshot = StateSnapshot::builder()
            .entity_id("light.desk_lamp")
            .state("on")
            .attribute("brightness", json!(200))
            .build()
            .unwrap();

        publisher.handle_state_change(Some(&snapshot)).await;

        assert_eq!(
            transport.topics(),
            vec![
                "homeassistant/light/desk_lamp/config",
                "home/light/desk_lamp/state",
                "home/light/desk_lamp/availability",
            ]
        );
        let config = json_payload(&transport, "homeassistant/light/desk_lamp/config");
        assert_eq!(config["brightness"], json!(true));
        assert_eq!(
            json_payload(&transport, "home/light/desk_lamp/state"),
            json!({"state": "ON", "brightness": 200})
        );
    }

    #[tokio::test]
    async fn should_link_device_from_registry() {
        let transport = Arc::new(SpyTransport::default());
        let metadata = InMemoryMetadata {
            devices: HashMap::from([(
                "switch.kitchen".to_string(),
                DeviceInfo {
                    manufacturer: Some("Acme".to_string()),
                    model: Some("Plug 2".to_string()),
                    ..DeviceInfo::default()
                },
            )]),
            ..InMemoryMetadata::default()
        };
        let publisher = publisher_with(&settings(), Arc::clone(&transport), metadata);

        publisher.handle_state_change(Some(&switch("on"))).await;

        let config = json_payload(&transport, "homeassistant/switch/kitchen/config");
        assert_eq!(config["dev"], json!({"mf": "Acme", "mdl": "Plug 2"}));
    }

    #[tokio::test]
    async fn should_share_registry_across_publishers_on_same_root() {
        let registry = Arc::new(PublicationRegistry::new());
        let transport = Arc::new(SpyTransport::default());
        let settings = settings();
        let make = || {
            DiscoveryPublisher::new(
                &settings,
                Arc::clone(&registry),
                Arc::clone(&transport),
                IncludeExcludeFilter::default(),
                Arc::new(InMemoryMetadata::default()),
                Arc::new(InMemoryMetadata::default()),
            )
        };

        make().handle_state_change(Some(&switch("on"))).await;
        make().handle_state_change(Some(&switch("on"))).await;

        assert_eq!(transport.count("homeassistant/switch/kitchen/config"), 1);
        assert_eq!(registry.len("homeassistant/"), 1);
    }

    #[tokio::test]
    async fn should_continue_cycle_after_failed_publish() {
        let transport = Arc::new(SpyTransport::failing_on("home/switch/kitchen/state"));
        let publisher = publisher(Arc::clone(&transport));

        publisher.handle_state_change(Some(&switch("on"))).await;

        assert_eq!(
            transport.topics(),
            vec![
                "homeassistant/switch/kitchen/config",
                "home/switch/kitchen/attributes",
                "home/switch/kitchen/availability",
            ]
        );
    }

    #[tokio::test]
    async fn should_process_stream_in_arrival_order() {
        let transport = Arc::new(SpyTransport::default());
        let publisher = publisher(Arc::clone(&transport));
        let notifications =
            tokio_stream::iter(vec![Some(switch("on")), None, Some(switch("off"))]);

        publisher.run(notifications).await;

        assert_eq!(transport.count("home/switch/kitchen/state"), 2);
        assert_eq!(transport.payload("home/switch/kitchen/state").unwrap(), "off");
    }
}
