//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the translation engine and the outside
//! world: the MQTT broker, the action dispatcher, and the registries that
//! hold entity metadata. Everything behind them is an external collaborator.

pub mod dispatcher;
pub mod filter;
pub mod metadata;
pub mod transport;

pub use dispatcher::ActionDispatcher;
pub use filter::EntityFilter;
pub use metadata::{DeviceRegistry, FeatureFlags};
pub use transport::{InboundMessage, Qos, Transport};
