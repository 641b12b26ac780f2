//! Environment variable overrides for the effective config.

use super::{SchemaMode, schema};
use crate::ConfigError;
use serde_json::{Map, Value};

/// Overrides `api.base_url`.
pub const ENV_API_BASE_URL: &str = "NOWYOUSEEME_API_BASE_URL";
/// Overrides `api.timeout_secs`.
pub const ENV_API_TIMEOUT_SECS: &str = "NOWYOUSEEME_API_TIMEOUT_SECS";

/// Build a config overlay from environment variables, if any are set.
///
/// Blank values are ignored so that `VAR=` falls back to lower layers.
pub(super) fn env_overlay(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<Value>, ConfigError> {
    let mut api = Map::new();

    if let Some(base_url) = non_blank(lookup(ENV_API_BASE_URL)) {
        api.insert("base_url".to_string(), Value::String(base_url));
    }
    if let Some(raw) = non_blank(lookup(ENV_API_TIMEOUT_SECS)) {
        let timeout: u64 = raw.parse().map_err(|_| ConfigError::EnvOverride {
            var: ENV_API_TIMEOUT_SECS,
            message: format!("expected a whole number of seconds, got '{raw}'"),
        })?;
        api.insert("timeout_secs".to_string(), Value::from(timeout));
    }

    if api.is_empty() {
        return Ok(None);
    }
    let mut root = Map::new();
    root.insert("api".to_string(), Value::Object(api));
    let overlay = Value::Object(root);
    schema::validate_layer_schema(&overlay, SchemaMode::Partial, "env")?;
    Ok(Some(overlay))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
