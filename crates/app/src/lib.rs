//! # discoverystream-app
//!
//! Application layer — the translation engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** the outside world must implement:
//!   - `Transport`: publish/subscribe against the MQTT broker
//!   - `ActionDispatcher`: execute decoded control actions
//!   - `DeviceRegistry` / `FeatureFlags`: entity metadata lookups
//!   - `EntityFilter`: include/exclude decision per entity
//! - **Outbound**: map state-change notifications to discovery configs,
//!   state, attribute and availability payloads (`DiscoveryPublisher`)
//! - **Inbound**: decode MQTT command topics into typed action requests
//!   (`CommandDecoder`, `CommandHandler`)
//! - Track which entities already have a discovery config (`PublicationRegistry`)
//!
//! ## Dependency rule
//! Depends on `discoverystream-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod commands;
pub mod encoders;
pub mod filter;
pub mod ports;
pub mod publisher;
pub mod registry;
pub mod settings;
pub mod state_feed;
pub mod topic;
