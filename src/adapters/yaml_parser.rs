// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML tree parser adapter.
//!
//! This module provides a parser that maps YAML documents onto the generic
//! configuration tree.

use crate::domain::{ConfigError, ConfigNode, Result};
use crate::ports::TreeParser;
use serde_yaml::Value;

/// Name given to the root node of every YAML document.
const ROOT_NAME: &str = "config";

/// YAML parser implementation.
///
/// Mappings become sections, scalars become leaves, and a sequence under a key
/// becomes that key repeated once per element. `null` and an empty sequence map
/// to an empty value; an empty mapping stays an empty section.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::YamlParser;
/// use treecfg::ports::TreeParser;
///
/// let parser = YamlParser::new();
/// let root = parser.parse("mysection:\n  id: 1\n  name: MySection").unwrap();
/// let section = &root.children()[0];
/// assert_eq!(section.name(), "mysection");
/// assert_eq!(section.children()[0].text(), Some("1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Converts a YAML value under `name` into one node per occurrence.
    fn nodes(name: &str, value: &Value) -> Vec<ConfigNode> {
        match value {
            Value::Mapping(map) => {
                let mut node = ConfigNode::branch(name);
                for (key, val) in map {
                    match Self::key_string(key) {
                        Some(key) => {
                            for child in Self::nodes(&key, val) {
                                node.push_child(child);
                            }
                        }
                        None => tracing::debug!("Skipping non-scalar YAML key under '{}'", name),
                    }
                }
                vec![node]
            }
            Value::Sequence(seq) if seq.is_empty() => vec![ConfigNode::leaf(name, String::new())],
            Value::Sequence(seq) => seq
                .iter()
                .flat_map(|item| match item {
                    // A sequence directly inside a sequence has no key of its
                    // own, so its elements are keyed by index.
                    Value::Sequence(inner) => {
                        let mut node = ConfigNode::branch(name);
                        for (i, val) in inner.iter().enumerate() {
                            for child in Self::nodes(&i.to_string(), val) {
                                node.push_child(child);
                            }
                        }
                        vec![node]
                    }
                    other => Self::nodes(name, other),
                })
                .collect(),
            Value::String(s) => vec![ConfigNode::leaf(name, s.clone())],
            Value::Number(n) => vec![ConfigNode::leaf(name, n.to_string())],
            Value::Bool(b) => vec![ConfigNode::leaf(name, b.to_string())],
            Value::Null => vec![ConfigNode::leaf(name, String::new())],
            Value::Tagged(tagged) => Self::nodes(name, &tagged.value),
        }
    }

    fn key_string(key: &Value) -> Option<String> {
        match key {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl TreeParser for YamlParser {
    fn parse(&self, content: &str) -> Result<ConfigNode> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })?;

        match value {
            Value::Null => Ok(ConfigNode::new(ROOT_NAME)),
            Value::Mapping(_) => {
                let mut nodes = Self::nodes(ROOT_NAME, &value);
                Ok(nodes.pop().unwrap_or_else(|| ConfigNode::new(ROOT_NAME)))
            }
            _ => Err(ConfigError::ParseError {
                message: "top-level YAML value must be a mapping".to_string(),
                source: None,
            }),
        }
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
