// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing port implementations.
//!
//! This module contains the concrete format parsers implementing
//! `TreeParser`, the environment resolver implementing `VariableResolver`, and
//! the file reader that hands source text to the parsers.

pub mod env_var;
pub mod source_file;
#[cfg(feature = "xml")]
pub mod xml_parser;
#[cfg(feature = "yaml")]
pub mod yaml_parser;

// Re-export adapters based on feature flags
pub use env_var::EnvVarAdapter;
pub use source_file::SourceFile;
#[cfg(feature = "xml")]
pub use xml_parser::XmlParser;
#[cfg(feature = "yaml")]
pub use yaml_parser::YamlParser;
