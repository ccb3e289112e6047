// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixtures shared by the integration tests.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use treecfg::adapters::EnvVarAdapter;

/// The reference application document.
#[allow(dead_code)]
pub const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<config>
<appname>beeapi</appname>
<httpport>8080</httpport>
<mysqlport>3600</mysqlport>
<PI>3.1415976</PI>
<runmode>dev</runmode>
<autorender>false</autorender>
<copyrequestbody>true</copyrequestbody>
<path1>${GOPATH}</path1>
<path2>${GOPATH||/home/go}</path2>
<mysection>
<id>1</id>
<name>MySection</name>
</mysection>
</config>
"#;

/// The same document in YAML.
#[allow(dead_code)]
pub const APP_YAML: &str = r#"
appname: beeapi
httpport: 8080
mysqlport: 3600
PI: 3.1415976
runmode: dev
autorender: false
copyrequestbody: true
path1: "${GOPATH}"
path2: "${GOPATH||/home/go}"
mysection:
  id: 1
  name: MySection
"#;

/// Writes `content` to a temporary file with the given suffix.
///
/// The file is deleted when the returned handle is dropped.
#[allow(dead_code)]
pub fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("treecfg-")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

/// A resolver holding exactly `pairs`, isolated from the process environment.
#[allow(dead_code)]
pub fn fixed_vars(pairs: &[(&str, &str)]) -> Arc<EnvVarAdapter> {
    let values: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Arc::new(EnvVarAdapter::with_values(values))
}

/// Installs a test-writer subscriber so `tracing` output shows up on failure.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
