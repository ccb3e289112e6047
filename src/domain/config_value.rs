// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type with type-safe conversions.
//!
//! This module provides the `ConfigValue` type, which wraps an (already
//! interpolated) scalar and converts it to the types the accessor layer hands
//! out.

use crate::domain::errors::{ConfigError, InvalidBool, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A type-safe wrapper for scalar configuration values.
///
/// # Examples
///
/// ```
/// use treecfg::domain::ConfigValue;
///
/// let value = ConfigValue::from("8080");
/// assert_eq!(value.as_i32("httpport").unwrap(), 8080);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// Creates a new `ConfigValue` from a `String`.
    pub fn new(value: String) -> Self {
        ConfigValue(value)
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the value into a `String`.
    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Converts the value to a boolean.
    ///
    /// Recognizes the following values (case-insensitive):
    /// - `true`: "true", "t", "yes", "y", "1", "on"
    /// - `false`: "false", "f", "no", "n", "0", "off"
    ///
    /// # Examples
    ///
    /// ```
    /// use treecfg::domain::ConfigValue;
    ///
    /// assert!(!ConfigValue::from("False").as_bool("autorender").unwrap());
    /// assert!(ConfigValue::from("on").as_bool("copyrequestbody").unwrap());
    /// assert!(ConfigValue::from("maybe").as_bool("flag").is_err());
    /// ```
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self.0.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" | "on" => Ok(true),
            "false" | "f" | "no" | "n" | "0" | "off" => Ok(false),
            _ => Err(ConfigError::from_invalid_bool(
                key.to_string(),
                InvalidBool(self.0.clone()),
            )),
        }
    }

    /// Converts the value to an `i32`.
    pub fn as_i32(&self, key: &str) -> Result<i32> {
        self.0
            .parse::<i32>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to an `i64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treecfg::domain::ConfigValue;
    ///
    /// let value = ConfigValue::from("3600");
    /// assert_eq!(value.as_i64("mysqlport").unwrap(), 3600i64);
    /// ```
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        self.0
            .parse::<i64>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to an `f64`.
    ///
    /// Scientific notation (`6.02e23`) is accepted.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        self.0
            .parse::<f64>()
            .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e))
    }

    /// Splits the value on `delimiter` into trimmed, non-empty parts.
    ///
    /// An empty value yields an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use treecfg::domain::ConfigValue;
    ///
    /// let value = ConfigValue::from("a; b;;c");
    /// assert_eq!(value.as_list(';'), vec!["a", "b", "c"]);
    /// assert!(ConfigValue::from("").as_list(';').is_empty());
    /// ```
    pub fn as_list(&self, delimiter: char) -> Vec<String> {
        self.0
            .split(delimiter)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Parses the value into any type that implements `FromStr`.
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.0
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(s.to_string())
    }
}

impl From<ConfigValue> for String {
    fn from(value: ConfigValue) -> Self {
        value.0
    }
}

impl AsRef<str> for ConfigValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
