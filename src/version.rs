// file: src/version.rs
// description: package version and the version metadata map

use serde_json::{Map, Value};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns `given` (or an empty map) with `"xchembku"` set to the package version.
pub fn meta(given: Option<Map<String, Value>>) -> Map<String, Value> {
    let mut meta = given.unwrap_or_default();
    meta.insert("xchembku".to_string(), Value::String(version().to_string()));
    meta
}
