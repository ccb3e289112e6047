// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the core domain types of the crate: keys and values,
//! the generic parsed tree, the flattened value store, cancellation contexts,
//! errors, and the `Configuration` trait. It is independent of any concrete
//! source format.

pub mod config_key;
pub mod config_node;
pub mod config_value;
pub mod context;
pub mod errors;
pub mod section;
pub mod service;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_node::ConfigNode;
pub use config_value::ConfigValue;
pub use context::{Context, DoneReason};
pub use errors::{ConfigError, Result};
pub use section::{Entry, Section};
pub use service::{Configuration, RawValue};
