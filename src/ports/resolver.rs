// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variable resolver trait definition.
//!
//! Interpolation of `${NAME}` tokens looks names up through this port, so the
//! process environment can be swapped for a fixed table in tests or for any
//! other lookup an application needs.

/// A trait for resolving interpolation variables by name.
///
/// # Examples
///
/// ```rust
/// use treecfg::ports::VariableResolver;
///
/// struct Fixed;
///
/// impl VariableResolver for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn lookup(&self, variable: &str) -> Option<String> {
///         (variable == "GOPATH").then(|| "/home/go".to_string())
///     }
/// }
///
/// assert_eq!(Fixed.lookup("GOPATH").as_deref(), Some("/home/go"));
/// assert!(Fixed.lookup("HOME").is_none());
/// ```
pub trait VariableResolver: Send + Sync {
    /// Returns a short identifier for logging, such as `"env"`.
    fn name(&self) -> &str;

    /// Returns the value of `variable`, or `None` if it is not set.
    fn lookup(&self, variable: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Empty;

    impl VariableResolver for Empty {
        fn name(&self) -> &str {
            "empty"
        }

        fn lookup(&self, _variable: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_resolver_lookup_missing() {
        assert!(Empty.lookup("ANYTHING").is_none());
        assert_eq!(Empty.name(), "empty");
    }

    #[test]
    fn test_resolver_is_shareable() {
        let resolver: Arc<dyn VariableResolver> = Arc::new(Empty);
        let clone = Arc::clone(&resolver);
        assert_eq!(clone.name(), "empty");
    }
}
