// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide registry of format parsers.
//!
//! Formats are registered under a name (`"xml"`, `"yaml"`) and looked up either
//! by that name or by a file extension one of the parsers claims. The built-in
//! parsers are present from first use, subject to their feature flags.

use crate::domain::{ConfigError, Result};
use crate::ports::TreeParser;
use crate::service::TreeConfig;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

type ParserMap = HashMap<String, Arc<dyn TreeParser>>;

static REGISTRY: Lazy<RwLock<ParserMap>> = Lazy::new(|| {
    #[allow(unused_mut)]
    let mut parsers: ParserMap = HashMap::new();
    #[cfg(feature = "xml")]
    parsers.insert(
        "xml".to_string(),
        Arc::new(crate::adapters::XmlParser::new()),
    );
    #[cfg(feature = "yaml")]
    parsers.insert(
        "yaml".to_string(),
        Arc::new(crate::adapters::YamlParser::new()),
    );
    RwLock::new(parsers)
});

fn read_registry() -> RwLockReadGuard<'static, ParserMap> {
    REGISTRY.read().unwrap_or_else(|poisoned| {
        tracing::warn!("Parser registry lock poisoned; recovering");
        poisoned.into_inner()
    })
}

fn write_registry() -> RwLockWriteGuard<'static, ParserMap> {
    REGISTRY.write().unwrap_or_else(|poisoned| {
        tracing::warn!("Parser registry lock poisoned; recovering");
        poisoned.into_inner()
    })
}

fn normalize(name: &str) -> String {
    name.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Registers `parser` under the format name `name`.
///
/// Names are case-insensitive. Registering an existing name replaces the
/// previous parser, which is returned.
///
/// # Examples
///
/// ```rust
/// use treecfg::domain::{ConfigNode, Result};
/// use treecfg::ports::TreeParser;
/// use treecfg::service::{parser_for, register_parser};
/// use std::sync::Arc;
///
/// struct LineParser;
///
/// impl TreeParser for LineParser {
///     fn parse(&self, content: &str) -> Result<ConfigNode> {
///         let mut root = ConfigNode::new("config");
///         for line in content.lines() {
///             if let Some((key, value)) = line.split_once('=') {
///                 root.push_child(ConfigNode::leaf(key.trim(), value.trim()));
///             }
///         }
///         Ok(root)
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
/// }
///
/// register_parser("lines", Arc::new(LineParser));
/// assert!(parser_for("lines").is_ok());
/// ```
pub fn register_parser(
    name: impl AsRef<str>,
    parser: Arc<dyn TreeParser>,
) -> Option<Arc<dyn TreeParser>> {
    let name = normalize(name.as_ref());
    tracing::debug!(
        "Registering parser for format '{}' (extensions: {:?})",
        name,
        parser.supported_extensions()
    );
    write_registry().insert(name, parser)
}

/// Returns the parser registered under the format name `name`.
///
/// # Errors
///
/// * `UnknownFormat` - no parser is registered under `name`
pub fn parser_for(name: &str) -> Result<Arc<dyn TreeParser>> {
    let key = normalize(name);
    read_registry()
        .get(&key)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownFormat {
            format: name.to_string(),
        })
}

/// Returns a parser claiming the file extension `extension`.
///
/// A parser registered under the extension itself wins; otherwise the first
/// format, in name order, listing it among its supported extensions.
pub fn parser_for_extension(extension: &str) -> Result<Arc<dyn TreeParser>> {
    let ext = normalize(extension);
    let registry = read_registry();
    if let Some(parser) = registry.get(&ext) {
        return Ok(Arc::clone(parser));
    }

    let mut names: Vec<&String> = registry.keys().collect();
    names.sort();
    names
        .into_iter()
        .filter_map(|name| registry.get(name))
        .find(|parser| {
            parser
                .supported_extensions()
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(&ext))
        })
        .cloned()
        .ok_or_else(|| ConfigError::UnknownFormat {
            format: extension.to_string(),
        })
}

/// Returns the names of all registered formats, sorted.
pub fn formats() -> Vec<String> {
    let mut names: Vec<String> = read_registry().keys().cloned().collect();
    names.sort();
    names
}

/// Loads the file at `source` with the parser registered as `format`.
///
/// # Errors
///
/// * `UnknownFormat` - `format` is not registered
/// * `SourceError` - the file cannot be read
/// * `ParseError` - the file is not a valid document of that format
///
/// # Examples
///
/// ```rust,no_run
/// use treecfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let config = new_config("xml", "conf/app.xml")?;
/// let port = config.get_int(&Context::background(), "httpport")?;
/// # Ok(())
/// # }
/// ```
pub fn new_config(format: &str, source: impl AsRef<Path>) -> Result<TreeConfig> {
    let parser = parser_for(format)?;
    TreeConfig::builder()
        .with_parser(parser)
        .with_file(source)?
        .build()
}
