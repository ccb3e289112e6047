// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration access trait definition.
//!
//! This module defines the `Configuration` trait, the surface application code
//! reads configuration through: typed accessors, mutation, section extraction
//! and struct binding.

use crate::domain::{Context, Result, Section};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// The uninterpreted value behind a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawValue {
    /// Interpolated scalar text.
    Text(String),
    /// A section, exactly as stored.
    Section(Section),
    /// Every occurrence of a repeated key, in document order.
    List(Vec<RawValue>),
}

impl RawValue {
    /// Returns the text if this is a scalar value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the section if this is a section value.
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            RawValue::Section(section) => Some(section),
            _ => None,
        }
    }
}

/// Typed, hierarchical access to a configuration tree.
///
/// Every method takes a [`Context`] first. A call made with a context that is
/// already done fails with `ContextCanceled` without touching the store; pass
/// [`Context::background()`] when there is nothing to cancel.
///
/// Scalar accessors interpolate `${NAME}` and `${NAME||default}` tokens in
/// parsed values from the environment before converting; values written with
/// [`set`](Configuration::set) are read back as written. Missing keys are always an error, except
/// for [`get_strings`](Configuration::get_strings), which returns an empty list.
///
/// # Examples
///
/// ```rust
/// use treecfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let config = TreeConfig::from_string(
///     "xml",
///     "<config><httpport>8080</httpport><mysection><id>1</id></mysection></config>",
/// )?;
/// let ctx = Context::background();
///
/// assert_eq!(config.get_int(&ctx, "httpport")?, 8080);
/// assert_eq!(config.sub(&ctx, "mysection")?.get_int(&ctx, "id")?, 1);
/// # Ok(())
/// # }
/// ```
pub trait Configuration {
    /// Returns the interpolated text stored under `key`.
    ///
    /// # Errors
    ///
    /// * `ConfigKeyNotFound` - nothing is stored under `key`
    /// * `TypeConversionError` - `key` addresses a section
    fn get_string(&self, ctx: &Context, key: &str) -> Result<String>;

    /// Returns the value under `key` parsed as a base-10 `i32`.
    fn get_int(&self, ctx: &Context, key: &str) -> Result<i32>;

    /// Returns the value under `key` parsed as a base-10 `i64`.
    fn get_int64(&self, ctx: &Context, key: &str) -> Result<i64>;

    /// Returns the value under `key` parsed as an `f64`.
    fn get_float(&self, ctx: &Context, key: &str) -> Result<f64>;

    /// Returns the value under `key` parsed as a boolean literal.
    fn get_bool(&self, ctx: &Context, key: &str) -> Result<bool>;

    /// Returns the value under `key` split into a list.
    ///
    /// A single value is split on the configured delimiter; a repeated key
    /// yields one item per occurrence. An absent or empty key yields an empty
    /// list rather than an error.
    fn get_strings(&self, ctx: &Context, key: &str) -> Result<Vec<String>>;

    /// Returns whatever is stored under `key` without conversion.
    fn get_raw(&self, ctx: &Context, key: &str) -> Result<RawValue>;

    /// Stores `value` under `key`, creating sections along a dotted path.
    ///
    /// The value is kept verbatim: reading it back yields `value` even when it
    /// contains `${...}` tokens.
    fn set(&self, ctx: &Context, key: &str, value: &str) -> Result<()>;

    /// Returns a snapshot of the direct scalar children of the section `name`.
    fn get_section(&self, ctx: &Context, name: &str) -> Result<HashMap<String, String>>;

    /// Returns an independent view rooted at the section `name`.
    ///
    /// The view is a snapshot: later writes to either side are not shared.
    fn sub(&self, ctx: &Context, name: &str) -> Result<Self>
    where
        Self: Sized;

    /// Binds the section `key` (the current root when empty) onto `T`.
    ///
    /// Field names map to child keys; use `#[serde(rename = "...")]` to bind a
    /// field to a differently named child and `#[serde(default)]` to leave
    /// unmapped fields at their default. The value is built fresh, so a failure
    /// leaves nothing partially assigned.
    fn unmarshal<T>(&self, ctx: &Context, key: &str) -> Result<T>
    where
        Self: Sized,
        T: DeserializeOwned;

    /// Returns `true` if anything is stored under `key`.
    fn has(&self, ctx: &Context, key: &str) -> bool;

    /// Returns the keys at the root of this view.
    fn keys(&self, ctx: &Context) -> Result<Vec<String>>;

    /// Like [`get_string`](Configuration::get_string), falling back to `default`.
    fn get_string_or(&self, ctx: &Context, key: &str, default: &str) -> String {
        self.get_string(ctx, key)
            .unwrap_or_else(|_| default.to_string())
    }

    /// Like [`get_int`](Configuration::get_int), falling back to `default`.
    fn get_int_or(&self, ctx: &Context, key: &str, default: i32) -> i32 {
        self.get_int(ctx, key).unwrap_or(default)
    }

    /// Like [`get_int64`](Configuration::get_int64), falling back to `default`.
    fn get_int64_or(&self, ctx: &Context, key: &str, default: i64) -> i64 {
        self.get_int64(ctx, key).unwrap_or(default)
    }

    /// Like [`get_float`](Configuration::get_float), falling back to `default`.
    fn get_float_or(&self, ctx: &Context, key: &str, default: f64) -> f64 {
        self.get_float(ctx, key).unwrap_or(default)
    }

    /// Like [`get_bool`](Configuration::get_bool), falling back to `default`.
    fn get_bool_or(&self, ctx: &Context, key: &str, default: bool) -> bool {
        self.get_bool(ctx, key).unwrap_or(default)
    }
}
