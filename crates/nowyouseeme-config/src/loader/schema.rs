//! Schema validation helpers for gallery client JSON5 configuration.

use super::SchemaMode;
use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
///
/// `null` leaves are accepted in partial layers (they reset a key during the
/// merge) but not in the effective config.
pub(super) fn validate_layer_schema(
    value: &Value,
    mode: SchemaMode,
    layer: &str,
) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "api", "ui"], layer, "")?;

    if let Some(value) = present(map, "$schema", mode, layer, "")? {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = present(map, "api", mode, layer, "")? {
        validate_api(value, mode, layer, "api")?;
    }
    if let Some(value) = present(map, "ui", mode, layer, "")? {
        validate_ui(value, mode, layer, "ui")?;
    }

    Ok(())
}

/// Validate the "api" block.
fn validate_api(value: &Value, mode: SchemaMode, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["base_url", "timeout_secs"], layer, path)?;
    if let Some(value) = present(map, "base_url", mode, layer, path)? {
        expect_string(value, layer, &join_path(path, "base_url"))?;
    }
    if let Some(value) = present(map, "timeout_secs", mode, layer, path)? {
        expect_u64(value, layer, &join_path(path, "timeout_secs"))?;
    }
    Ok(())
}

/// Validate the "ui" block.
fn validate_ui(value: &Value, mode: SchemaMode, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["tick_rate_ms"], layer, path)?;
    if let Some(value) = present(map, "tick_rate_ms", mode, layer, path)? {
        expect_u64(value, layer, &join_path(path, "tick_rate_ms"))?;
    }
    Ok(())
}

/// Look up a key, treating `null` as absent in partial layers.
fn present<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    mode: SchemaMode,
    layer: &str,
    path: &str,
) -> Result<Option<&'a Value>, ConfigError> {
    match (map.get(key), mode) {
        (Some(Value::Null), SchemaMode::Partial) => Ok(None),
        (Some(Value::Null), SchemaMode::Full) => Err(invalid_field(
            layer,
            &join_path(path, key),
            "unexpected null",
        )),
        (value, _) => Ok(value),
    }
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a non-negative JSON integer or return a typed error.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let path = if path.is_empty() { "root" } else { path };
    ConfigError::Schema {
        layer: layer.to_string(),
        path: path.to_string(),
        message: message.to_string(),
    }
}
