// SPDX-License-Identifier: MIT OR Apache-2.0

//! The value store: a parsed tree flattened into key-addressable entries.
//!
//! Each node with children becomes a [`Section`], each leaf becomes a scalar
//! [`Entry`]. Sibling nodes sharing a name are kept together as a list entry,
//! so nothing the parser produced becomes unreachable.

use crate::domain::{ConfigError, ConfigKey, ConfigNode, Result};
use std::borrow::Cow;
use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashMap;

/// A single value in the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// Raw (not yet interpolated) text of a leaf node.
    Scalar(String),
    /// Text stored through [`Section::set`]; handed out verbatim, never
    /// interpolated.
    Literal(String),
    /// A nested section.
    Section(Section),
    /// All occurrences of a repeated sibling name, in document order.
    List(Vec<Entry>),
}

impl Entry {
    fn from_node(node: ConfigNode) -> Self {
        let branch = node.is_branch();
        let (_, text, children) = node.into_parts();
        if !branch {
            Entry::Scalar(text.unwrap_or_default())
        } else {
            Entry::Section(Section::from_parts(text, children))
        }
    }

    /// Returns the stored scalar text of this entry, before any
    /// interpolation.
    ///
    /// For a list entry this is the last occurrence, if that one is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Entry::Scalar(text) | Entry::Literal(text) => Some(text),
            Entry::Section(_) => None,
            Entry::List(items) => items.last().and_then(Entry::as_scalar),
        }
    }

    /// Returns the scalar value of this entry as readers see it.
    ///
    /// Parsed text goes through `expand`; literal text is returned as stored.
    /// For a list entry this is the last occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::borrow::Cow;
    /// use treecfg::domain::Entry;
    ///
    /// let parsed = Entry::Scalar("a".into());
    /// let written = Entry::Literal("a".into());
    ///
    /// assert_eq!(parsed.resolve(|raw| Cow::Owned(raw.to_uppercase())).as_deref(), Some("A"));
    /// assert_eq!(written.resolve(|raw| Cow::Owned(raw.to_uppercase())).as_deref(), Some("a"));
    /// ```
    pub fn resolve<'a, F>(&'a self, expand: F) -> Option<Cow<'a, str>>
    where
        F: Fn(&'a str) -> Cow<'a, str>,
    {
        match self {
            Entry::Scalar(raw) => Some(expand(raw)),
            Entry::Literal(text) => Some(Cow::Borrowed(text)),
            Entry::Section(_) => None,
            Entry::List(items) => items.last().and_then(|item| item.resolve(expand)),
        }
    }

    /// Resolves every scalar occurrence held by this entry, in order.
    pub fn resolve_all<'a, F>(&'a self, expand: F) -> Vec<Cow<'a, str>>
    where
        F: Fn(&'a str) -> Cow<'a, str>,
    {
        match self {
            Entry::List(items) => items
                .iter()
                .filter_map(|item| item.resolve(&expand))
                .collect(),
            other => other.resolve(expand).into_iter().collect(),
        }
    }

    /// Returns the section held by this entry.
    ///
    /// For a list entry this is the last occurrence, if that one is a section.
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Entry::Scalar(_) | Entry::Literal(_) => None,
            Entry::Section(section) => Some(section),
            Entry::List(items) => items.last().and_then(Entry::as_section),
        }
    }

    /// Returns `true` if this entry resolves to a section.
    pub fn is_section(&self) -> bool {
        self.as_section().is_some()
    }

    /// Returns the text of every scalar occurrence held by this entry.
    pub fn scalars(&self) -> Vec<&str> {
        match self {
            Entry::Scalar(text) | Entry::Literal(text) => vec![text.as_str()],
            Entry::Section(_) => Vec::new(),
            Entry::List(items) => items.iter().filter_map(Entry::as_scalar).collect(),
        }
    }
}

/// A flattened configuration tree rooted at one node.
///
/// The root of a document and every nested section share this type, which is
/// what lets a sub-view support the same contract as the top-level store.
///
/// # Examples
///
/// ```
/// use treecfg::domain::{ConfigKey, ConfigNode, Section};
///
/// let root = ConfigNode::new("config")
///     .with_child(ConfigNode::leaf("httpport", "8080"))
///     .with_child(ConfigNode::new("mysection").with_child(ConfigNode::leaf("id", "1")));
///
/// let store = Section::build(root);
/// assert_eq!(store.get(&ConfigKey::from("httpport")).and_then(|e| e.as_scalar()), Some("8080"));
/// assert!(store.section(&ConfigKey::from("mysection")).is_some());
/// assert_eq!(store.get(&ConfigKey::from("mysection.id")).and_then(|e| e.as_scalar()), Some("1"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Section {
    text: Option<String>,
    entries: BTreeMap<String, Entry>,
}

impl Section {
    /// Creates an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a parsed tree into a store rooted at `root`.
    ///
    /// The root node's own name is not part of any key path.
    pub fn build(root: ConfigNode) -> Self {
        let (name, text, children) = root.into_parts();
        let section = Self::from_parts(text, children);
        tracing::debug!(
            "Built configuration store from <{}> with {} top-level entries",
            name,
            section.len()
        );
        section
    }

    fn from_parts(text: Option<String>, children: Vec<ConfigNode>) -> Self {
        let mut section = Section {
            text: text.filter(|t| !t.is_empty()),
            entries: BTreeMap::new(),
        };
        for child in children {
            let name = child.name().to_string();
            section.insert(name, Entry::from_node(child));
        }
        section
    }

    fn insert(&mut self, name: String, entry: Entry) {
        match self.entries.entry(name) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
            }
            btree_map::Entry::Occupied(mut slot) => {
                tracing::debug!("Key '{}' repeats; keeping all occurrences", slot.key());
                let existing = slot.get_mut();
                match existing {
                    Entry::List(items) => items.push(entry),
                    _ => {
                        let first = std::mem::replace(existing, Entry::List(Vec::new()));
                        *existing = Entry::List(vec![first, entry]);
                    }
                }
            }
        }
    }

    /// Looks up the entry addressed by `key`.
    ///
    /// The key is first tried literally at this level; only then are its dots
    /// treated as section separators.
    pub fn get(&self, key: &ConfigKey) -> Option<&Entry> {
        if let Some(entry) = self.entries.get(key.as_str()) {
            return Some(entry);
        }
        let (head, rest) = key.split_first()?;
        self.entries
            .get(head)?
            .as_section()?
            .get(&ConfigKey::from(rest))
    }

    /// Returns the section addressed by `key`; the empty key addresses `self`.
    pub fn section(&self, key: &ConfigKey) -> Option<&Section> {
        if key.is_root() {
            return Some(self);
        }
        self.get(key)?.as_section()
    }

    /// Stores `value` under `key` as a literal that reads return unchanged.
    ///
    /// Missing sections along a dotted path are created. Overwriting a section
    /// with a scalar, or nesting a key beneath a scalar, is rejected.
    pub fn set(&mut self, key: &ConfigKey, value: String) -> Result<()> {
        if key.is_root() {
            return Err(ConfigError::InvalidKey {
                key: String::new(),
                message: "cannot assign a value to the root section".to_string(),
            });
        }
        self.assign(key, key.as_str(), value)
    }

    fn assign(&mut self, path: &ConfigKey, full_key: &str, value: String) -> Result<()> {
        if let Some(entry) = self.entries.get_mut(path.as_str()) {
            if entry.is_section() {
                return Err(ConfigError::InvalidKey {
                    key: full_key.to_string(),
                    message: "key addresses a section".to_string(),
                });
            }
            *entry = Entry::Literal(value);
            return Ok(());
        }

        let Some((head, rest)) = path.split_first() else {
            self.entries.insert(path.to_string(), Entry::Literal(value));
            return Ok(());
        };

        if head.is_empty() || rest.is_empty() {
            return Err(ConfigError::InvalidKey {
                key: full_key.to_string(),
                message: "empty path segment".to_string(),
            });
        }

        let entry = self
            .entries
            .entry(head.to_string())
            .or_insert_with(|| Entry::Section(Section::new()));
        let target = match entry {
            Entry::Section(section) => Some(section),
            Entry::List(items) => match items.last_mut() {
                Some(Entry::Section(section)) => Some(section),
                _ => None,
            },
            Entry::Scalar(_) | Entry::Literal(_) => None,
        };

        match target {
            Some(section) => section.assign(&ConfigKey::from(rest), full_key, value),
            None => Err(ConfigError::InvalidKey {
                key: full_key.to_string(),
                message: format!("'{}' is a scalar value and cannot hold nested keys", head),
            }),
        }
    }

    /// Returns the direct scalar children of this section as raw text.
    ///
    /// Nested sections are skipped; repeated keys contribute their last value.
    pub fn scalars(&self) -> HashMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(key, entry)| entry.as_scalar().map(|v| (key.clone(), v.to_string())))
            .collect()
    }

    /// Iterates over the entries of this section in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the keys of this section in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the text a mixed-content node carried next to its children.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the number of direct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the section has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
