// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for binding sections onto structs.

mod common;

use common::fixed_vars;
use serde::Deserialize;
use treecfg::prelude::*;

const SERVER_XML: &str = r#"<config>
    <server>
        <name>api</name>
        <port>${PORT||8080}</port>
        <debug>on</debug>
        <ratio>0.75</ratio>
        <tags>blue; green</tags>
        <mode>production</mode>
        <limits>
            <requests>100</requests>
            <burst>20</burst>
        </limits>
        <backend>10.0.0.1</backend>
        <backend>10.0.0.2</backend>
    </server>
    <broken>
        <port>eighty</port>
    </broken>
</config>"#;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Mode {
    Development,
    Production,
}

#[derive(Debug, Deserialize)]
struct Limits {
    requests: u32,
    burst: u32,
}

#[derive(Debug, Deserialize)]
struct Server {
    #[serde(rename = "name")]
    title: String,
    port: u16,
    debug: bool,
    ratio: f64,
    tags: Vec<String>,
    mode: Mode,
    limits: Limits,
    #[serde(rename = "backend")]
    backends: Vec<String>,
    #[serde(default)]
    timeout: Option<u64>,
}

fn config(vars: &[(&str, &str)]) -> TreeConfig {
    TreeConfig::builder()
        .with_format("xml")
        .unwrap()
        .with_content(SERVER_XML)
        .with_resolver(fixed_vars(vars))
        .build()
        .unwrap()
}

#[test]
fn test_unmarshal_all_field_kinds() {
    let server: Server = config(&[])
        .unmarshal(&Context::background(), "server")
        .unwrap();

    assert_eq!(server.title, "api");
    assert_eq!(server.port, 8080);
    assert!(server.debug);
    assert_eq!(server.ratio, 0.75);
    assert_eq!(server.tags, vec!["blue", "green"]);
    assert_eq!(server.mode, Mode::Production);
    assert_eq!(server.limits.requests, 100);
    assert_eq!(server.limits.burst, 20);
    assert_eq!(server.backends, vec!["10.0.0.1", "10.0.0.2"]);
    assert_eq!(server.timeout, None);
}

#[test]
fn test_unmarshal_interpolates() {
    let server: Server = config(&[("PORT", "9000")])
        .unmarshal(&Context::background(), "server")
        .unwrap();
    assert_eq!(server.port, 9000);
}

#[test]
fn test_unmarshal_root() {
    #[derive(Debug, Deserialize)]
    struct Root {
        server: ServerName,
    }

    #[derive(Debug, Deserialize)]
    struct ServerName {
        name: String,
    }

    let root: Root = config(&[]).unmarshal(&Context::background(), "").unwrap();
    assert_eq!(root.server.name, "api");
}

#[test]
fn test_unmarshal_defaults_for_unmapped_fields() {
    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Partial {
        name: String,
        retries: u8,
        owner: String,
    }

    let partial: Partial = config(&[])
        .unmarshal(&Context::background(), "server")
        .unwrap();
    assert_eq!(partial.name, "api");
    assert_eq!(partial.retries, 0);
    assert_eq!(partial.owner, "");
}

#[test]
fn test_unmarshal_conversion_failure_names_field() {
    #[derive(Debug, Deserialize)]
    struct Broken {
        #[allow(dead_code)]
        port: u16,
    }

    let err = config(&[])
        .unmarshal::<Broken>(&Context::background(), "broken")
        .unwrap_err();
    match err {
        ConfigError::BindError { field, .. } => assert_eq!(field, "port"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unmarshal_missing_field_names_section() {
    #[derive(Debug, Deserialize)]
    struct NeedsOwner {
        #[allow(dead_code)]
        owner: String,
    }

    let err = config(&[])
        .unmarshal::<NeedsOwner>(&Context::background(), "server")
        .unwrap_err();
    match err {
        ConfigError::BindError { field, source } => {
            assert_eq!(field, "server");
            assert!(source.to_string().contains("owner"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unmarshal_nested_failure_path() {
    #[derive(Debug, Deserialize)]
    struct Outer {
        #[allow(dead_code)]
        limits: BadLimits,
    }

    #[derive(Debug, Deserialize)]
    struct BadLimits {
        #[allow(dead_code)]
        requests: bool,
    }

    let err = config(&[])
        .unmarshal::<Outer>(&Context::background(), "server")
        .unwrap_err();
    match err {
        ConfigError::BindError { field, .. } => assert_eq!(field, "limits.requests"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unmarshal_missing_section() {
    let result = config(&[]).unmarshal::<Limits>(&Context::background(), "nope");
    assert!(matches!(result, Err(ConfigError::SectionNotFound { .. })));

    let result = config(&[]).unmarshal::<Limits>(&Context::background(), "server.port");
    assert!(matches!(result, Err(ConfigError::SectionNotFound { .. })));
}

#[test]
fn test_unmarshal_cancelled() {
    let ctx = Context::new();
    ctx.cancel();
    let result = config(&[]).unmarshal::<Limits>(&ctx, "server.limits");
    assert!(matches!(result, Err(ConfigError::ContextCanceled { .. })));
}

#[test]
fn test_unmarshal_after_set() {
    let config = config(&[]);
    let ctx = Context::background();

    config.set(&ctx, "server.limits.burst", "50").unwrap();
    let limits: Limits = config.unmarshal(&ctx, "server.limits").unwrap();
    assert_eq!(limits.burst, 50);
}

#[cfg(feature = "yaml")]
#[test]
fn test_unmarshal_from_yaml() {
    let config = TreeConfig::from_string(
        "yaml",
        "server:\n  name: api\n  port: 81\n  backend:\n    - a\n    - b\n",
    )
    .unwrap();

    #[derive(Debug, Deserialize)]
    struct Small {
        name: String,
        port: u16,
        backend: Vec<String>,
    }

    let small: Small = config.unmarshal(&Context::background(), "server").unwrap();
    assert_eq!(small.name, "api");
    assert_eq!(small.port, 81);
    assert_eq!(small.backend, vec!["a", "b"]);
}
