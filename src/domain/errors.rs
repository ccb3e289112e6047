// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! This module defines the error types that can occur when parsing a configuration
//! tree or reading values out of it. All errors use `thiserror` for proper error
//! handling and conversion.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// The main error type for configuration operations.
///
/// This enum represents all possible errors that can occur when reading, parsing,
/// or accessing configuration values. It is marked as `#[non_exhaustive]` to allow
/// for future additions without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use treecfg::domain::errors::ConfigError;
///
/// fn get_config_value() -> Result<String, ConfigError> {
///     Err(ConfigError::ConfigKeyNotFound {
///         key: "database.host".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested configuration key does not exist.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// The requested key does not address a section.
    #[error("Configuration section not found: {section}")]
    SectionNotFound {
        /// The section key that was requested
        section: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to bind a section onto a target structure.
    #[error("Failed to bind field '{field}': {source}")]
    BindError {
        /// Dotted path of the offending field, relative to the bound section
        field: String,
        /// The underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The caller's context was cancelled before the operation started.
    #[error("Operation on key '{key}' cancelled: {reason}")]
    ContextCanceled {
        /// The key the operation was addressing
        key: String,
        /// Why the context is done
        reason: String,
    },

    /// A key cannot be used for the requested operation.
    #[error("Invalid configuration key '{key}': {message}")]
    InvalidKey {
        /// The offending key
        key: String,
        /// What is wrong with it
        message: String,
    },

    /// No parser is registered for the requested format.
    #[error("Unknown configuration format: {format}")]
    UnknownFormat {
        /// The format name or file extension that was requested
        format: String,
    },

    /// An error occurred while locating or reading a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message, including the position when known
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Error returned when a string is not one of the recognised boolean literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a recognised boolean literal")]
pub struct InvalidBool(pub String);

// Implement conversions from common parsing errors to TypeConversionError
impl ConfigError {
    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError for an unrecognised boolean literal.
    pub fn from_invalid_bool(key: String, err: InvalidBool) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }

    /// Re-homes an error raised while binding the value of `field`.
    ///
    /// Bind errors coming out of nested sections get `field` prepended to their
    /// path; any other error becomes the cause of a new bind error.
    pub(crate) fn at_field(self, field: &str) -> Self {
        match self {
            ConfigError::BindError { field: inner, source } if inner.is_empty() => {
                ConfigError::BindError {
                    field: field.to_string(),
                    source,
                }
            }
            ConfigError::BindError { field: inner, source } => ConfigError::BindError {
                field: format!("{}.{}", field, inner),
                source,
            },
            other => ConfigError::BindError {
                field: field.to_string(),
                source: Box::new(other),
            },
        }
    }
}

impl serde::de::Error for ConfigError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ConfigError::BindError {
            field: String::new(),
            source: msg.to_string().into(),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
