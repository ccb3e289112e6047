// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-variable interpolation of raw values.
//!
//! `${NAME}` is replaced by the value of `NAME` (empty when unset) and
//! `${NAME||default}` by the value of `NAME` when it is set and non-empty, else
//! by `default`. Tokens are expanded once, left to right; text produced by an
//! expansion is never scanned again.

use crate::ports::VariableResolver;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

const TOKEN_OPEN: &str = "${";
const TOKEN_CLOSE: char = '}';
const DEFAULT_SEPARATOR: &str = "||";

/// Expands `${...}` tokens through a [`VariableResolver`].
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::EnvVarAdapter;
/// use treecfg::service::Interpolator;
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// let mut values = HashMap::new();
/// values.insert("HOST".to_string(), "db.local".to_string());
/// let interpolator = Interpolator::new(Arc::new(EnvVarAdapter::with_values(values)));
///
/// assert_eq!(interpolator.expand("tcp://${HOST}:${PORT||5432}"), "tcp://db.local:5432");
/// ```
#[derive(Clone)]
pub struct Interpolator {
    resolver: Arc<dyn VariableResolver>,
}

impl Interpolator {
    /// Creates an interpolator looking variables up through `resolver`.
    pub fn new(resolver: Arc<dyn VariableResolver>) -> Self {
        Self { resolver }
    }

    /// Returns the resolver variables are looked up through.
    pub fn resolver(&self) -> &Arc<dyn VariableResolver> {
        &self.resolver
    }

    /// Expands every token in `raw`.
    ///
    /// Values without tokens are returned borrowed. An opening `${` without a
    /// closing brace is kept literally.
    pub fn expand<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if !raw.contains(TOKEN_OPEN) {
            return Cow::Borrowed(raw);
        }

        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(start) = rest.find(TOKEN_OPEN) {
            out.push_str(&rest[..start]);
            let token_start = &rest[start + TOKEN_OPEN.len()..];
            match token_start.find(TOKEN_CLOSE) {
                Some(end) => {
                    out.push_str(&self.resolve_token(&token_start[..end]));
                    rest = &token_start[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        Cow::Owned(out)
    }

    fn resolve_token(&self, token: &str) -> String {
        let (name, default) = match token.split_once(DEFAULT_SEPARATOR) {
            Some((name, default)) => (name.trim(), Some(default.trim())),
            None => (token.trim(), None),
        };

        let value = self.resolver.lookup(name);
        match default {
            Some(default) => match value {
                Some(value) if !value.is_empty() => value,
                _ => {
                    tracing::trace!(
                        "Variable '{}' unset in {}; using default",
                        name,
                        self.resolver.name()
                    );
                    default.to_string()
                }
            },
            None => value.unwrap_or_else(|| {
                tracing::trace!("Variable '{}' unset in {}", name, self.resolver.name());
                String::new()
            }),
        }
    }
}

impl fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpolator")
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::EnvVarAdapter;
    use std::collections::HashMap;

    fn interpolator(pairs: &[(&str, &str)]) -> Interpolator {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Interpolator::new(Arc::new(EnvVarAdapter::with_values(values)))
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        let interp = interpolator(&[]);
        assert!(matches!(interp.expand("beeapi"), Cow::Borrowed("beeapi")));
    }

    #[test]
    fn test_unset_variable_is_empty() {
        let interp = interpolator(&[]);
        assert_eq!(interp.expand("${GOPATH}"), "");
    }

    #[test]
    fn test_unset_variable_uses_default() {
        let interp = interpolator(&[]);
        assert_eq!(interp.expand("${GOPATH||/home/go}"), "/home/go");
    }

    #[test]
    fn test_set_variable_wins_in_both_forms() {
        let interp = interpolator(&[("GOPATH", "/opt/go")]);
        assert_eq!(interp.expand("${GOPATH}"), "/opt/go");
        assert_eq!(interp.expand("${GOPATH||/home/go}"), "/opt/go");
    }

    #[test]
    fn test_empty_variable_falls_back_to_default() {
        let interp = interpolator(&[("GOPATH", "")]);
        assert_eq!(interp.expand("${GOPATH||/home/go}"), "/home/go");
        assert_eq!(interp.expand("${GOPATH}"), "");
    }

    #[test]
    fn test_tokens_inside_text() {
        let interp = interpolator(&[("USER", "astaxie")]);
        assert_eq!(
            interp.expand("/home/${USER}/go:${MISSING||x}!"),
            "/home/astaxie/go:x!"
        );
    }

    #[test]
    fn test_expansion_is_not_rescanned() {
        let interp = interpolator(&[("A", "${B}"), ("B", "nope")]);
        assert_eq!(interp.expand("${A}"), "${B}");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let interp = interpolator(&[("PORT", "8080")]);
        assert_eq!(interp.expand("${ PORT }"), "8080");
        assert_eq!(interp.expand("${ MISSING || fallback }"), "fallback");
    }

    #[test]
    fn test_unterminated_token_is_literal() {
        let interp = interpolator(&[("A", "1")]);
        assert_eq!(interp.expand("${A} and ${A"), "1 and ${A");
    }

    #[test]
    fn test_empty_default() {
        let interp = interpolator(&[]);
        assert_eq!(interp.expand("[${MISSING||}]"), "[]");
    }

    #[test]
    fn test_debug_names_resolver() {
        let interp = interpolator(&[]);
        assert!(format!("{:?}", interp).contains("env"));
    }
}
