//! # discoverystream-domain
//!
//! Pure domain model for the discoverystream MQTT bridge.
//!
//! ## Responsibilities
//! - Foundational types: error taxonomy, timestamps
//! - Define **Entity references** (`domain.object_id`) and **state snapshots**
//! - Define **Availability** (the `online`/`offline` view of an entity state)
//! - Define **Device metadata** used for discovery device linkage
//! - Define **Discovery configs** (the retained per-entity documents)
//! - Define **Colors** (HS, XY, RGB) shared by the light encoder and decoder
//! - Define **Action requests** (decoded inbound commands)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod action;
pub mod color;
pub mod device;
pub mod discovery;
pub mod entity;
