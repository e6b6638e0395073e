//! # discoverystreamd — discovery-stream bridge daemon
//!
//! Composition root that wires the engine to the outside world.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and install logging
//! - Connect the rumqttc transport
//! - Read state snapshots from stdin and feed them to the publisher
//! - Subscribe to command topics and write decoded actions to stdout
//! - Shut down on Ctrl-C or when stdin closes
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No translation logic belongs here.

mod config;
mod metadata;
mod stdio;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use discoverystream_adapter_mqtt::MqttTransport;
use discoverystream_app::commands::{CommandDecoder, CommandHandler, subscribe_commands};
use discoverystream_app::filter::IncludeExcludeFilter;
use discoverystream_app::publisher::DiscoveryPublisher;
use discoverystream_app::registry::PublicationRegistry;
use discoverystream_app::state_feed::StateFeed;

use crate::config::Config;
use crate::metadata::StaticMetadata;
use crate::stdio::JsonLinesDispatcher;

/// How long to wait for the event loop to flush after DISCONNECT.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    init_logging(&config.logging.filter);

    let settings = &config.bridge;
    let roots = settings.roots();
    tracing::info!(
        base_topic = %roots.base,
        discovery_topic = %roots.discovery,
        publish_discovery = settings.publish_discovery,
        "starting discoverystreamd"
    );

    let metadata = Arc::new(
        StaticMetadata::from_config(&config.entities).context("reading entity metadata")?,
    );
    let (transport, inbound, event_loop) = MqttTransport::connect(&config.mqtt);

    let publisher = DiscoveryPublisher::new(
        settings,
        Arc::new(PublicationRegistry::new()),
        transport.clone(),
        IncludeExcludeFilter::new(&settings.filter),
        Arc::clone(&metadata),
        metadata,
    );
    let handler = CommandHandler::new(
        CommandDecoder::new(&roots.base),
        JsonLinesDispatcher::new(tokio::io::stdout()),
    );

    if settings.publish_discovery {
        subscribe_commands(&transport, &roots.base).await;
    }

    let (feed, states) = StateFeed::channel();
    let source = tokio::spawn(async move {
        match stdio::forward_states(BufReader::new(tokio::io::stdin()), &feed).await {
            Ok(count) => tracing::info!(count, "state source closed"),
            Err(err) => tracing::error!(%err, "failed to read state source"),
        }
    });

    tokio::select! {
        () = publisher.run(states) => {}
        () = handler.run(inbound) => tracing::warn!("MQTT event loop ended"),
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                tracing::error!(%err, "failed to listen for Ctrl-C");
            }
            tracing::info!("shutdown requested");
        }
    }

    source.abort();
    if let Err(err) = transport.disconnect().await {
        tracing::debug!(%err, "disconnect skipped");
    }
    if tokio::time::timeout(SHUTDOWN_GRACE, event_loop).await.is_err() {
        tracing::warn!("MQTT event loop did not stop in time");
    }
    tracing::info!("discoverystreamd stopped");
    Ok(())
}

/// Logs go to stderr; stdout carries the action stream.
fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), falling back to info");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
