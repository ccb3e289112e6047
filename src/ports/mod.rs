// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) the configuration core
//! depends on: parsing a source format into a tree, and resolving interpolation
//! variables. They are implemented by adapters in the adapters layer.

pub mod parser;
pub mod resolver;

// Re-export commonly used types
pub use parser::TreeParser;
pub use resolver::VariableResolver;
