//! Device — the physical or virtual thing behind one or more entities.
//!
//! Only the metadata needed to link a discovery config to a device is
//! modelled here; the registry that owns devices lives outside the bridge.

use serde::{Deserialize, Serialize};

/// Device metadata resolved from the external device registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub name: Option<String>,
    pub sw_version: Option<String>,
    /// `(namespace, identifier)` pairs, e.g. `("zha", "00:11:22:33")`.
    pub identifiers: Vec<(String, String)>,
    /// `(connection type, value)` pairs, e.g. `("mac", "aa:bb:cc:dd:ee:ff")`.
    pub connections: Vec<(String, String)>,
}
