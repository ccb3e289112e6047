// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities and mock implementations for testing.
//!
//! This module provides mock implementations of the ports so the service can
//! be exercised without a real document format or environment.

use mocks::{MockParser, MockResolver};
use std::sync::Arc;
use treecfg::prelude::*;

mod mocks {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use treecfg::domain::{ConfigError, ConfigNode, Result};
    use treecfg::ports::{TreeParser, VariableResolver};

    /// A parser that ignores its input and hands out a fixed tree.
    #[derive(Debug, Clone)]
    pub struct MockParser {
        root: ConfigNode,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl MockParser {
        /// Creates a parser returning an empty `config` root.
        pub fn new() -> Self {
            Self {
                root: ConfigNode::new("config"),
                fail: false,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Adds a leaf to the returned tree.
        pub fn with_value(mut self, key: &str, value: &str) -> Self {
            self.root.push_child(ConfigNode::leaf(key, value));
            self
        }

        /// Adds a section to the returned tree.
        pub fn with_section(mut self, name: &str, pairs: &[(&str, &str)]) -> Self {
            let mut section = ConfigNode::new(name);
            for (key, value) in pairs {
                section.push_child(ConfigNode::leaf(*key, *value));
            }
            self.root.push_child(section);
            self
        }

        /// Makes every parse fail.
        pub fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        /// Returns how often `parse` was called.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TreeParser for MockParser {
        fn parse(&self, _content: &str) -> Result<ConfigNode> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ConfigError::ParseError {
                    message: "mock parse failure".to_string(),
                    source: None,
                });
            }
            Ok(self.root.clone())
        }

        fn supported_extensions(&self) -> &[&str] {
            &["mock"]
        }
    }

    /// A resolver over a fixed map that records what was looked up.
    #[derive(Debug, Default)]
    pub struct MockResolver {
        values: HashMap<String, String>,
        lookups: std::sync::Mutex<Vec<String>>,
    }

    impl MockResolver {
        /// Creates a resolver holding `pairs`.
        pub fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                values: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                lookups: Default::default(),
            }
        }

        /// Returns every name looked up so far, in order.
        pub fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    impl VariableResolver for MockResolver {
        fn name(&self) -> &str {
            "mock"
        }

        fn lookup(&self, variable: &str) -> Option<String> {
            self.lookups.lock().unwrap().push(variable.to_string());
            self.values.get(variable).cloned()
        }
    }
}

fn build(parser: MockParser, resolver: Arc<MockResolver>) -> TreeConfig {
    TreeConfig::builder()
        .with_parser(Arc::new(parser))
        .with_content("ignored")
        .with_resolver(resolver)
        .build()
        .unwrap()
}

#[test]
fn test_mock_parser_feeds_store() {
    let parser = MockParser::new()
        .with_value("appname", "mock")
        .with_section("db", &[("port", "5432")]);
    let config = build(parser.clone(), Arc::new(MockResolver::default()));
    let ctx = Context::background();

    assert_eq!(parser.calls(), 1);
    assert_eq!(config.get_string(&ctx, "appname").unwrap(), "mock");
    assert_eq!(config.get_int(&ctx, "db.port").unwrap(), 5432);
}

#[test]
fn test_mock_parser_failure_propagates() {
    let result = TreeConfig::builder()
        .with_parser(Arc::new(MockParser::new().failing()))
        .with_content("ignored")
        .build();
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn test_resolver_consulted_on_each_read() {
    let resolver = Arc::new(MockResolver::new(&[("HOST", "h1")]));
    let parser = MockParser::new().with_value("host", "${HOST}:${PORT||80}");
    let config = build(parser, Arc::clone(&resolver));
    let ctx = Context::background();

    assert!(resolver.lookups().is_empty());
    assert_eq!(config.get_string(&ctx, "host").unwrap(), "h1:80");
    assert_eq!(config.get_string(&ctx, "host").unwrap(), "h1:80");
    assert_eq!(resolver.lookups(), vec!["HOST", "PORT", "HOST", "PORT"]);
}

#[test]
fn test_resolver_shared_with_sub() {
    let resolver = Arc::new(MockResolver::new(&[("ID", "7")]));
    let parser = MockParser::new().with_section("s", &[("id", "${ID}")]);
    let config = build(parser, Arc::clone(&resolver));
    let ctx = Context::background();

    let sub = config.sub(&ctx, "s").unwrap();
    assert_eq!(sub.get_int(&ctx, "id").unwrap(), 7);
    assert_eq!(resolver.lookups(), vec!["ID"]);
}

#[test]
fn test_set_values_skip_resolver() {
    let resolver = Arc::new(MockResolver::new(&[("HOST", "h1")]));
    let config = build(MockParser::new(), Arc::clone(&resolver));
    let ctx = Context::background();

    config.set(&ctx, "host", "${HOST}").unwrap();
    assert_eq!(config.get_string(&ctx, "host").unwrap(), "${HOST}");
    assert!(resolver.lookups().is_empty());
}

#[test]
fn test_registered_mock_format() {
    register_parser("mock", Arc::new(MockParser::new().with_value("k", "v")));
    let config = TreeConfig::from_string("mock", "").unwrap();
    assert_eq!(config.get_string(&Context::background(), "k").unwrap(), "v");
}

#[test]
fn test_cancelled_reads_skip_resolver() {
    let resolver = Arc::new(MockResolver::new(&[]));
    let parser = MockParser::new().with_value("host", "${HOST}");
    let config = build(parser, Arc::clone(&resolver));

    let ctx = Context::new();
    ctx.cancel();
    assert!(config.get_string(&ctx, "host").is_err());
    assert!(resolver.lookups().is_empty());
}
