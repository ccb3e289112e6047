// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key paths addressing values and sections of a configuration tree.
//!
//! A key is either a simple name (`httpport`) addressing an entry at the current
//! level, or a dotted path (`mysection.name`) descending through sections. The
//! empty key addresses the current root.

use std::fmt;

/// Separator between the segments of a dotted key path.
pub const PATH_SEPARATOR: char = '.';

/// A key path into a configuration tree.
///
/// Keys are case-sensitive. The store always tries a key literally before
/// treating its dots as section separators, so tag names that themselves
/// contain dots stay addressable.
///
/// # Examples
///
/// ```
/// use treecfg::domain::ConfigKey;
///
/// let key = ConfigKey::from("mysection.name");
/// assert_eq!(key.split_first(), Some(("mysection", "name")));
/// assert!(ConfigKey::from("").is_root());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` if this key addresses the current root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits the key at its first separator into the head section name and
    /// the remaining relative path.
    ///
    /// Returns `None` for keys without a separator.
    pub fn split_first(&self) -> Option<(&str, &str)> {
        self.0.split_once(PATH_SEPARATOR)
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_key_from_str() {
        let key = ConfigKey::from("httpport");
        assert_eq!(key.as_str(), "httpport");
        assert_eq!(key.split_first(), None);
    }

    #[test]
    fn test_config_key_into_string() {
        let key = ConfigKey::from("mysection.id");
        assert_eq!(key.into_string(), "mysection.id");
    }

    #[test]
    fn test_config_key_display() {
        let key = ConfigKey::from("mysection.name");
        assert_eq!(format!("{}", key), "mysection.name");
    }

    #[test]
    fn test_config_key_root() {
        assert!(ConfigKey::from("").is_root());
        assert!(ConfigKey::default().is_root());
        assert!(!ConfigKey::from("a").is_root());
    }

    #[test]
    fn test_split_first() {
        let key = ConfigKey::from("a.b.c");
        assert_eq!(key.split_first(), Some(("a", "b.c")));
        assert_eq!(ConfigKey::from("plain").split_first(), None);
    }

    #[test]
    fn test_split_first_keeps_empty_segments() {
        assert_eq!(ConfigKey::from("a..b").split_first(), Some(("a", ".b")));
        assert_eq!(ConfigKey::from(".a").split_first(), Some(("", "a")));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut map = HashMap::new();
        map.insert(ConfigKey::from("PI"), 1);

        assert_eq!(map.get(&ConfigKey::from("PI")), Some(&1));
        assert_eq!(map.get(&ConfigKey::from("pi")), None);
    }
}
