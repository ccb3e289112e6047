// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration implementation.
//!
//! This module ties the ports together: [`TreeConfig`] implements the
//! `Configuration` trait over a store built by a registered parser, the
//! [`Interpolator`] expands variables through a resolver, and the registry maps
//! format names to parsers.

mod binder;
pub mod interpolator;
pub mod registry;
pub mod tree_config;

// Re-export commonly used types
pub use interpolator::Interpolator;
pub use registry::{formats, new_config, parser_for, parser_for_extension, register_parser};
pub use tree_config::{TreeConfig, TreeConfigBuilder, DEFAULT_LIST_DELIMITER};
