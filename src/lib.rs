// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical, format-agnostic configuration trees.
//!
//! This crate loads a configuration document through a format adapter (XML or
//! YAML out of the box), flattens it into a key-addressable store, and serves
//! typed reads, environment-variable interpolation, section views and struct
//! binding over it.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ConfigKey`, `ConfigValue`, `ConfigNode`,
//!   `Section`, `Context`, errors) and the `Configuration` trait
//! - **Ports**: Trait definitions for what the core depends on (`TreeParser`,
//!   `VariableResolver`)
//! - **Adapters**: Format parsers, the environment resolver and file reading
//! - **Service**: `TreeConfig`, interpolation, struct binding and the format
//!   registry
//!
//! # Features
//!
//! - **Typed access**: string, `i32`, `i64`, `f64`, bool and list accessors with
//!   explicit conversion errors
//! - **Interpolation**: `${NAME}` and `${NAME||default}` expanded on every read
//! - **Sections**: flat section snapshots and independent sub-views
//! - **Binding**: `serde` types bound from a section by field name
//! - **Cancellation**: every call takes a [`Context`](domain::Context)
//! - **Extensible**: new formats are added by implementing `TreeParser` and
//!   registering it
//!
//! # Feature Flags
//!
//! - `xml`: Enable the XML adapter (default)
//! - `yaml`: Enable the YAML adapter (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use treecfg::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct MySection {
//!     id: i32,
//!     #[serde(rename = "name")]
//!     title: String,
//! }
//!
//! # fn main() -> Result<()> {
//! let config = TreeConfig::from_string(
//!     "xml",
//!     r#"<config>
//!         <httpport>8080</httpport>
//!         <path>${TREECFG_DOC_UNSET||/home/go}</path>
//!         <mysection><id>1</id><name>MySection</name></mysection>
//!     </config>"#,
//! )?;
//! let ctx = Context::background();
//!
//! assert_eq!(config.get_int(&ctx, "httpport")?, 8080);
//! assert_eq!(config.get_string(&ctx, "path")?, "/home/go");
//!
//! let section: MySection = config.unmarshal(&ctx, "mysection")?;
//! assert_eq!(section.id, 1);
//! assert_eq!(section.title, "MySection");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigKey, ConfigNode, ConfigValue, Configuration, Context, RawValue,
        Result, Section,
    };
    pub use crate::ports::{TreeParser, VariableResolver};
    pub use crate::service::{new_config, register_parser, TreeConfig, TreeConfigBuilder};

    pub use crate::adapters::{EnvVarAdapter, SourceFile};
    // Re-export adapters based on feature flags
    #[cfg(feature = "xml")]
    pub use crate::adapters::XmlParser;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
