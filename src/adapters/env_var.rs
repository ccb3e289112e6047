// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable resolver adapter.
//!
//! This module provides the adapter interpolation uses to look up `${NAME}`
//! tokens in the process environment.

use crate::ports::VariableResolver;
use std::collections::HashMap;
use std::env;

/// Maximum length for environment variable names
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Variable resolver backed by environment variables.
///
/// By default every lookup reads the live process environment, so values set
/// after the configuration was loaded are picked up on the next read. An
/// optional prefix is prepended to every looked-up name.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::EnvVarAdapter;
/// use treecfg::ports::VariableResolver;
///
/// // Read the process environment
/// let adapter = EnvVarAdapter::new();
///
/// // `${PORT}` resolves MYAPP_PORT
/// let adapter = EnvVarAdapter::with_prefix("MYAPP_");
/// assert_eq!(adapter.name(), "env");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvVarAdapter {
    /// Optional prefix prepended to looked-up names
    prefix: Option<String>,
    /// Fixed values used instead of the process environment
    values: Option<HashMap<String, String>>,
}

impl EnvVarAdapter {
    /// Creates a resolver reading the process environment.
    pub fn new() -> Self {
        Self {
            prefix: None,
            values: None,
        }
    }

    /// Creates a resolver reading the process environment with a name prefix.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prepended to every variable name (e.g., "APP_")
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            values: None,
        }
    }

    /// Creates a resolver over a fixed set of values.
    ///
    /// **Note**: This method is primarily intended for testing. It lets tests
    /// interpolate deterministic values without touching the process
    /// environment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treecfg::adapters::EnvVarAdapter;
    /// use treecfg::ports::VariableResolver;
    /// use std::collections::HashMap;
    ///
    /// let mut values = HashMap::new();
    /// values.insert("GOPATH".to_string(), "/home/go".to_string());
    ///
    /// let adapter = EnvVarAdapter::with_values(values);
    /// assert_eq!(adapter.lookup("GOPATH").as_deref(), Some("/home/go"));
    /// ```
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            prefix: None,
            values: Some(values),
        }
    }

    fn full_name<'a>(&self, variable: &'a str) -> std::borrow::Cow<'a, str> {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, variable).into(),
            None => variable.into(),
        }
    }
}

impl VariableResolver for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn lookup(&self, variable: &str) -> Option<String> {
        let name = self.full_name(variable);
        if let Some(values) = &self.values {
            return values.get(name.as_ref()).cloned();
        }

        // Reject names the OS cannot hold and oversized names
        if name.is_empty() || name.len() > MAX_ENV_KEY_LEN || name.contains(['=', '\0']) {
            tracing::debug!("Skipping invalid environment variable name: len={}", name.len());
            return None;
        }

        let value = env::var(name.as_ref()).ok()?;
        if value.len() > MAX_ENV_VALUE_LEN {
            tracing::debug!(
                "Skipping oversized environment variable '{}': value_len={} (max {})",
                name,
                value.len(),
                MAX_ENV_VALUE_LEN
            );
            return None;
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to set and clean up environment variables
    struct EnvGuard {
        keys: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard { keys: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.keys.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in &self.keys {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_env_adapter_name() {
        let adapter = EnvVarAdapter::new();
        assert_eq!(adapter.name(), "env");
    }

    #[test]
    fn test_env_adapter_lookup() {
        let mut guard = EnvGuard::new();
        guard.set("TREECFG_ENV_ADAPTER_LOOKUP", "test_value");

        let adapter = EnvVarAdapter::new();
        assert_eq!(
            adapter.lookup("TREECFG_ENV_ADAPTER_LOOKUP").as_deref(),
            Some("test_value")
        );
    }

    #[test]
    fn test_env_adapter_lookup_nonexistent() {
        let adapter = EnvVarAdapter::new();
        assert!(adapter.lookup("TREECFG_NONEXISTENT_VAR_12345").is_none());
    }

    #[test]
    fn test_env_adapter_reads_live_environment() {
        let mut guard = EnvGuard::new();
        let adapter = EnvVarAdapter::new();
        assert!(adapter.lookup("TREECFG_ENV_ADAPTER_LIVE").is_none());

        guard.set("TREECFG_ENV_ADAPTER_LIVE", "later");
        assert_eq!(
            adapter.lookup("TREECFG_ENV_ADAPTER_LIVE").as_deref(),
            Some("later")
        );
    }

    #[test]
    fn test_env_adapter_with_prefix() {
        let mut guard = EnvGuard::new();
        guard.set("TREECFG_PREFIXED_HOST", "localhost");

        let adapter = EnvVarAdapter::with_prefix("TREECFG_PREFIXED_");
        assert_eq!(adapter.lookup("HOST").as_deref(), Some("localhost"));
        assert!(adapter.lookup("TREECFG_PREFIXED_HOST").is_none());
    }

    #[test]
    fn test_env_adapter_invalid_names() {
        let adapter = EnvVarAdapter::new();
        assert!(adapter.lookup("").is_none());
        assert!(adapter.lookup("A=B").is_none());
        assert!(adapter.lookup(&"X".repeat(MAX_ENV_KEY_LEN + 1)).is_none());
    }

    #[test]
    fn test_env_adapter_with_values() {
        let mut values = HashMap::new();
        values.insert("GOPATH".to_string(), "/home/go".to_string());

        let adapter = EnvVarAdapter::with_values(values);
        assert_eq!(adapter.lookup("GOPATH").as_deref(), Some("/home/go"));
        assert!(adapter.lookup("PATH").is_none());
    }

    #[test]
    fn test_env_adapter_default() {
        let adapter = EnvVarAdapter::default();
        assert_eq!(adapter.name(), "env");
    }
}
