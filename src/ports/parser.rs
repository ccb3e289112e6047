// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tree parser trait definition.
//!
//! This module defines the `TreeParser` trait, which every source format (XML,
//! YAML, ...) implements to turn raw text into the generic [`ConfigNode`] tree
//! the value store is built from.

use crate::domain::{ConfigNode, Result};

/// A trait for parsing configuration documents into a generic tree.
///
/// The returned root node stands for the whole document; its children become
/// the top-level keys of the store. Text values are returned raw: `${...}`
/// tokens are interpolated later, at access time.
///
/// # Tree Shape
///
/// Parsers should map a nested document like:
///
/// ```xml
/// <config>
///   <httpport>8080</httpport>
///   <mysection><id>1</id></mysection>
/// </config>
/// ```
///
/// onto a root with a leaf `httpport` (text `"8080"`) and a node `mysection`
/// holding a leaf `id`. Repeated elements should be emitted as repeated
/// sibling nodes, not merged.
///
/// # Examples
///
/// ```rust
/// use treecfg::ports::TreeParser;
/// use treecfg::domain::{ConfigNode, Result};
///
/// struct LineParser;
///
/// impl TreeParser for LineParser {
///     fn parse(&self, content: &str) -> Result<ConfigNode> {
///         let mut root = ConfigNode::new("config");
///         for line in content.lines() {
///             if let Some((k, v)) = line.split_once('=') {
///                 root.push_child(ConfigNode::leaf(k.trim(), v.trim()));
///             }
///         }
///         Ok(root)
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["conf"]
///     }
/// }
///
/// let root = LineParser.parse("httpport = 8080").unwrap();
/// assert_eq!(root.children()[0].text(), Some("8080"));
/// ```
pub trait TreeParser: Send + Sync {
    /// Parses configuration content into a tree.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed input, with the
    /// position of the problem in the message when it is known.
    fn parse(&self, content: &str) -> Result<ConfigNode>;

    /// Returns the file extensions (without the leading dot) this parser reads.
    fn supported_extensions(&self) -> &[&str];
}
