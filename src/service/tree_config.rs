// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tree-backed `Configuration` implementation.
//!
//! A [`TreeConfig`] owns a flattened store behind a read-write lock. Reads share
//! the lock; [`set`](Configuration::set) is the single writer. Parsed values
//! are interpolated on the way out, so the store keeps the text exactly as the
//! source had it. Values written through `set` are returned as written.

use crate::adapters::{EnvVarAdapter, SourceFile};
use crate::domain::{
    ConfigError, ConfigKey, ConfigNode, ConfigValue, Configuration, Context, Entry, RawValue,
    Result, Section,
};
use crate::ports::{TreeParser, VariableResolver};
use crate::service::binder::{self, Binding};
use crate::service::registry;
use crate::service::Interpolator;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Separator used by [`get_strings`](Configuration::get_strings) unless the
/// builder sets another.
pub const DEFAULT_LIST_DELIMITER: char = ';';

const ROOT_FIELD: &str = "<root>";

/// Configuration backed by a parsed document tree.
///
/// # Examples
///
/// ```rust
/// use treecfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let config = TreeConfig::from_string(
///     "xml",
///     "<config><appname>beeapi</appname><PI>3.1415976</PI></config>",
/// )?;
/// let ctx = Context::background();
///
/// assert_eq!(config.get_string(&ctx, "appname")?, "beeapi");
/// assert_eq!(config.get_float(&ctx, "PI")?, 3.1415976);
///
/// config.set(&ctx, "appname", "other")?;
/// assert_eq!(config.get_string(&ctx, "appname")?, "other");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TreeConfig {
    store: RwLock<Section>,
    interpolator: Interpolator,
    list_delimiter: char,
}

impl TreeConfig {
    /// Creates an empty configuration resolving variables from the process
    /// environment.
    pub fn new() -> Self {
        Self::from_section(
            Section::new(),
            Interpolator::new(Arc::new(EnvVarAdapter::new())),
            DEFAULT_LIST_DELIMITER,
        )
    }

    /// Creates a new configuration builder.
    pub fn builder() -> TreeConfigBuilder {
        TreeConfigBuilder::new()
    }

    /// Parses `data` with the parser registered as `format`.
    ///
    /// # Errors
    ///
    /// * `UnknownFormat` - `format` is not registered
    /// * `ParseError` - `data` is not a valid document of that format
    pub fn from_string(format: &str, data: &str) -> Result<Self> {
        Self::builder().with_format(format)?.with_content(data).build()
    }

    fn from_section(section: Section, interpolator: Interpolator, list_delimiter: char) -> Self {
        Self {
            store: RwLock::new(section),
            interpolator,
            list_delimiter,
        }
    }

    /// Returns the separator [`get_strings`](Configuration::get_strings) splits on.
    pub fn list_delimiter(&self) -> char {
        self.list_delimiter
    }

    /// Returns a copy of the whole store as it currently stands.
    pub fn snapshot(&self) -> Section {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Section> {
        self.store.read().unwrap_or_else(|poisoned| {
            tracing::warn!("Configuration store lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Section> {
        self.store.write().unwrap_or_else(|poisoned| {
            tracing::warn!("Configuration store lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    fn expand<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        self.interpolator.expand(raw)
    }

    /// Scalar under `key` as readers see it, or the reason there is none.
    fn value(&self, ctx: &Context, key: &str, target: &str) -> Result<ConfigValue> {
        ensure_live(ctx, key)?;
        let store = self.read();
        let entry = store
            .get(&ConfigKey::from(key))
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: key.to_string(),
            })?;
        let value = entry
            .resolve(|raw| self.expand(raw))
            .ok_or_else(|| addresses_section(key, target))?;
        Ok(ConfigValue::from(value.into_owned()))
    }

    fn raw_value(&self, entry: &Entry) -> RawValue {
        match entry {
            Entry::Scalar(raw) => RawValue::Text(self.expand(raw).into_owned()),
            Entry::Literal(text) => RawValue::Text(text.clone()),
            Entry::Section(section) => RawValue::Section(section.clone()),
            Entry::List(items) => {
                RawValue::List(items.iter().map(|item| self.raw_value(item)).collect())
            }
        }
    }

    fn binding(&self) -> Binding<'_> {
        Binding {
            interpolator: &self.interpolator,
            delimiter: self.list_delimiter,
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_live(ctx: &Context, key: &str) -> Result<()> {
    match ctx.done() {
        Some(reason) => Err(ConfigError::ContextCanceled {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn addresses_section(key: &str, target: &str) -> ConfigError {
    ConfigError::TypeConversionError {
        key: key.to_string(),
        target_type: target.to_string(),
        source: "key addresses a section".into(),
    }
}

impl Configuration for TreeConfig {
    fn get_string(&self, ctx: &Context, key: &str) -> Result<String> {
        self.value(ctx, key, "string").map(String::from)
    }

    fn get_int(&self, ctx: &Context, key: &str) -> Result<i32> {
        self.value(ctx, key, "integer")?.as_i32(key)
    }

    fn get_int64(&self, ctx: &Context, key: &str) -> Result<i64> {
        self.value(ctx, key, "integer")?.as_i64(key)
    }

    fn get_float(&self, ctx: &Context, key: &str) -> Result<f64> {
        self.value(ctx, key, "float")?.as_f64(key)
    }

    fn get_bool(&self, ctx: &Context, key: &str) -> Result<bool> {
        self.value(ctx, key, "boolean")?.as_bool(key)
    }

    fn get_strings(&self, ctx: &Context, key: &str) -> Result<Vec<String>> {
        ensure_live(ctx, key)?;
        let store = self.read();
        match store.get(&ConfigKey::from(key)) {
            None => Ok(Vec::new()),
            Some(Entry::Section(_)) => Err(addresses_section(key, "list")),
            Some(entry @ Entry::List(_)) => Ok(entry
                .resolve_all(|raw| self.expand(raw))
                .into_iter()
                .map(Cow::into_owned)
                .collect()),
            Some(entry) => {
                let value = entry
                    .resolve(|raw| self.expand(raw))
                    .ok_or_else(|| addresses_section(key, "list"))?;
                Ok(ConfigValue::from(value.into_owned()).as_list(self.list_delimiter))
            }
        }
    }

    fn get_raw(&self, ctx: &Context, key: &str) -> Result<RawValue> {
        ensure_live(ctx, key)?;
        let store = self.read();
        store
            .get(&ConfigKey::from(key))
            .map(|entry| self.raw_value(entry))
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: key.to_string(),
            })
    }

    fn set(&self, ctx: &Context, key: &str, value: &str) -> Result<()> {
        ensure_live(ctx, key)?;
        self.write().set(&ConfigKey::from(key), value.to_string())?;
        tracing::debug!("Set configuration key '{}'", key);
        Ok(())
    }

    fn get_section(&self, ctx: &Context, name: &str) -> Result<HashMap<String, String>> {
        ensure_live(ctx, name)?;
        let store = self.read();
        let section = store
            .section(&ConfigKey::from(name))
            .ok_or_else(|| ConfigError::SectionNotFound {
                section: name.to_string(),
            })?;
        Ok(section
            .entries()
            .filter_map(|(key, entry)| {
                let value = entry.resolve(|raw| self.expand(raw))?;
                Some((key.to_string(), value.into_owned()))
            })
            .collect())
    }

    fn sub(&self, ctx: &Context, name: &str) -> Result<Self> {
        ensure_live(ctx, name)?;
        let section = self
            .read()
            .section(&ConfigKey::from(name))
            .cloned()
            .ok_or_else(|| ConfigError::SectionNotFound {
                section: name.to_string(),
            })?;
        Ok(Self::from_section(
            section,
            self.interpolator.clone(),
            self.list_delimiter,
        ))
    }

    fn unmarshal<T>(&self, ctx: &Context, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        ensure_live(ctx, key)?;
        let store = self.read();
        let section = store
            .section(&ConfigKey::from(key))
            .ok_or_else(|| ConfigError::SectionNotFound {
                section: key.to_string(),
            })?;
        binder::bind(section, self.binding()).map_err(|err| match err {
            ConfigError::BindError { field, source } if field.is_empty() => {
                ConfigError::BindError {
                    field: if key.is_empty() {
                        ROOT_FIELD.to_string()
                    } else {
                        key.to_string()
                    },
                    source,
                }
            }
            other => other,
        })
    }

    fn has(&self, ctx: &Context, key: &str) -> bool {
        !ctx.is_done() && self.read().get(&ConfigKey::from(key)).is_some()
    }

    fn keys(&self, ctx: &Context) -> Result<Vec<String>> {
        ensure_live(ctx, "")?;
        Ok(self.read().keys().map(str::to_string).collect())
    }
}

/// Builder for [`TreeConfig`].
///
/// The parser is chosen by [`with_parser`](Self::with_parser) or
/// [`with_format`](Self::with_format); failing both, by the extension of the
/// file given to [`with_file`](Self::with_file). Variables resolve from the
/// process environment unless another resolver is set.
///
/// # Examples
///
/// ```rust
/// use treecfg::prelude::*;
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// # fn main() -> Result<()> {
/// let mut vars = HashMap::new();
/// vars.insert("HOSTS".to_string(), "a,b".to_string());
///
/// let config = TreeConfig::builder()
///     .with_format("yaml")?
///     .with_content("hosts: \"${HOSTS}\"")
///     .with_resolver(Arc::new(EnvVarAdapter::with_values(vars)))
///     .with_list_delimiter(',')
///     .build()?;
///
/// let hosts = config.get_strings(&Context::background(), "hosts")?;
/// assert_eq!(hosts, vec!["a", "b"]);
/// # Ok(())
/// # }
/// ```
pub struct TreeConfigBuilder {
    parser: Option<Arc<dyn TreeParser>>,
    content: Option<String>,
    extension: Option<String>,
    resolver: Option<Arc<dyn VariableResolver>>,
    list_delimiter: char,
}

impl TreeConfigBuilder {
    /// Creates a builder with no content, the environment resolver and the
    /// default list delimiter.
    pub fn new() -> Self {
        Self {
            parser: None,
            content: None,
            extension: None,
            resolver: None,
            list_delimiter: DEFAULT_LIST_DELIMITER,
        }
    }

    /// Uses `parser` for the content.
    pub fn with_parser(mut self, parser: Arc<dyn TreeParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Uses the parser registered as `format`.
    pub fn with_format(self, format: &str) -> Result<Self> {
        let parser = registry::parser_for(format)?;
        Ok(self.with_parser(parser))
    }

    /// Uses `content` as the document text.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Reads the document from `path`.
    pub fn with_file(self, path: impl AsRef<Path>) -> Result<Self> {
        Ok(self.with_source(SourceFile::read(path)?))
    }

    /// Reads `filename` from the OS-appropriate configuration directory.
    pub fn with_default_location(
        self,
        app_name: &str,
        qualifier: &str,
        filename: &str,
    ) -> Result<Self> {
        Ok(self.with_source(SourceFile::from_default_location(
            app_name, qualifier, filename,
        )?))
    }

    fn with_source(mut self, source: SourceFile) -> Self {
        self.extension = source.extension().map(str::to_string);
        self.content = Some(source.into_content());
        self
    }

    /// Resolves variables from the process environment.
    pub fn with_env_vars(self) -> Self {
        self.with_resolver(Arc::new(EnvVarAdapter::new()))
    }

    /// Resolves `${NAME}` from the environment variable `{prefix}NAME`.
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        self.with_resolver(Arc::new(EnvVarAdapter::with_prefix(prefix)))
    }

    /// Resolves variables through `resolver`.
    pub fn with_resolver(mut self, resolver: Arc<dyn VariableResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Splits single values on `delimiter` in `get_strings`.
    pub fn with_list_delimiter(mut self, delimiter: char) -> Self {
        self.list_delimiter = delimiter;
        self
    }

    /// Parses the content and builds the configuration.
    ///
    /// A builder without content yields an empty configuration.
    ///
    /// # Errors
    ///
    /// * `UnknownFormat` - no parser was set and none claims the file extension
    /// * `ParseError` - the content is not a valid document
    pub fn build(self) -> Result<TreeConfig> {
        let root = match self.content {
            Some(content) => {
                let parser = match (self.parser, self.extension) {
                    (Some(parser), _) => parser,
                    (None, Some(ext)) => registry::parser_for_extension(&ext)?,
                    (None, None) => {
                        return Err(ConfigError::UnknownFormat {
                            format: "<unspecified>".to_string(),
                        })
                    }
                };
                parser.parse(&content)?
            }
            None => ConfigNode::new("config"),
        };

        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(EnvVarAdapter::new()));
        Ok(TreeConfig::from_section(
            Section::build(root),
            Interpolator::new(resolver),
            self.list_delimiter,
        ))
    }
}

impl Default for TreeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
