//! Layered configuration loader.
//!
//! Discovers configuration layers (user, cwd, runtime), validates their
//! schema, merges them, applies environment overrides and produces the final
//! `ClientConfig`.

mod env;
mod merge;
mod schema;

#[cfg(test)]
mod tests;

use crate::{ClientConfig, ConfigError};
use directories::UserDirs;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use env::{ENV_API_BASE_URL, ENV_API_TIMEOUT_SECS};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "nowyouseeme.json5";
/// Default config directory under the user's home.
const DEFAULT_CONFIG_DIR: &str = ".nowyouseeme";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: ClientConfig,
    /// Metadata for each layer applied during load.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-specific configuration.
    User,
    /// Current working directory configuration.
    Cwd,
    /// Explicit config files passed at runtime.
    Runtime,
    /// Environment variable overrides (highest precedence).
    Env,
}

impl ConfigLayerSource {
    fn name(self) -> &'static str {
        match self {
            ConfigLayerSource::User => "user",
            ConfigLayerSource::Cwd => "cwd",
            ConfigLayerSource::Runtime => "runtime",
            ConfigLayerSource::Env => "env",
        }
    }
}

/// Metadata about a config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk if present.
    pub path: Option<PathBuf>,
}

/// Schema validation mode for layered configs.
#[derive(Debug, Clone, Copy)]
enum SchemaMode {
    /// Partial validation for individual layers.
    Partial,
    /// Full validation for the effective config.
    Full,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to find the cwd layer.
    pub cwd: PathBuf,
    /// Optional user config path (defaults to `~/.nowyouseeme/nowyouseeme.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied after file layers.
    pub runtime_paths: Vec<PathBuf>,
    /// Whether to apply `NOWYOUSEEME_*` environment overrides.
    pub read_env: bool,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: UserDirs::new().map(|dirs| {
                dirs.home_dir()
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILE)
            }),
            runtime_paths: Vec::new(),
            read_env: true,
        }
    }

    /// Add a runtime override config path that is applied after file layers.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl ClientConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config from path: {}", path.display());
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let layer = format!("config({})", path.display());
        config_from_value(parse_json5(&contents, &layer)?, &layer)
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        config_from_value(parse_json5(contents, "config")?, "config")
    }

    /// Load a layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        info!(
            "loading layered config with defaults (cwd={})",
            cwd.as_ref().display()
        );
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load a layered config stack using explicit layer locations.
    ///
    /// Layer precedence (low -> high): user, cwd, runtime files, environment.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_env(options, |name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::load_layered_with_options`] with an injectable
    /// environment lookup.
    pub fn load_layered_with_env(
        options: LayeredConfigOptions,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<LayeredConfig, ConfigError> {
        let mut layers = Vec::new();
        let mut merged = Value::Object(serde_json::Map::new());
        let mut seen_paths = HashSet::new();

        let mut candidates = Vec::new();
        if let Some(path) = options.user_config_path.as_deref() {
            candidates.push((ConfigLayerSource::User, path.to_path_buf(), false));
        }
        candidates.push((
            ConfigLayerSource::Cwd,
            options.cwd.join(DEFAULT_CONFIG_FILE),
            false,
        ));
        for path in &options.runtime_paths {
            candidates.push((ConfigLayerSource::Runtime, path.clone(), true));
        }

        for (source, path, required) in candidates {
            let Some(value) = read_layer(source, &path, required)? else {
                continue;
            };
            let identity = path.canonicalize().unwrap_or_else(|_| path.clone());
            if !seen_paths.insert(identity) {
                debug!(
                    "skipping duplicate layer (source={}, path={})",
                    source.name(),
                    path.display()
                );
                continue;
            }
            merge::merge_layer(&mut merged, &value);
            layers.push(ConfigLayer {
                source,
                path: Some(path),
            });
        }

        if options.read_env {
            let overlay = env::env_overlay(lookup)?;
            if let Some(overlay) = overlay {
                debug!("applying environment overrides");
                merge::merge_layer(&mut merged, &overlay);
                layers.push(ConfigLayer {
                    source: ConfigLayerSource::Env,
                    path: None,
                });
            }
        }

        let config = config_from_value(merged, "effective")?;
        info!(
            "layered config loaded (layers={}, base_url={})",
            layers.len(),
            config.api.base_url
        );
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Setting {
                setting: "api.base_url",
                message: format!("must be an http:// or https:// url, got '{base_url}'"),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Setting {
                setting: "api.timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(ConfigError::Setting {
                setting: "ui.tick_rate_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Trim whitespace and trailing slashes from the base URL.
    fn normalize(&mut self) {
        let trimmed = self.api.base_url.trim().trim_end_matches('/');
        self.api.base_url = trimmed.to_string();
    }
}

/// Read and schema-check one layer file.
///
/// A missing optional file yields `None`; a missing required file is an error.
fn read_layer(
    source: ConfigLayerSource,
    path: &Path,
    required: bool,
) -> Result<Option<Value>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
            debug!(
                "optional layer missing (source={}, path={})",
                source.name(),
                path.display()
            );
            return Ok(None);
        }
        Err(err) => {
            return Err(ConfigError::Unreadable {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };
    debug!(
        "loading config layer (source={}, path={})",
        source.name(),
        path.display()
    );
    let layer = format!("{}({})", source.name(), path.display());
    let value = parse_json5(&contents, &layer)?;
    schema::validate_layer_schema(&value, SchemaMode::Partial, &layer)?;
    Ok(Some(value))
}

fn parse_json5(contents: &str, layer: &str) -> Result<Value, ConfigError> {
    json5::from_str(contents).map_err(|source| ConfigError::Syntax {
        layer: layer.to_string(),
        source,
    })
}

fn config_from_value(value: Value, label: &str) -> Result<ClientConfig, ConfigError> {
    schema::validate_layer_schema(&value, SchemaMode::Full, label)?;
    let mut config: ClientConfig = serde_json::from_value(value)?;
    config.normalize();
    config.validate()?;
    Ok(config)
}
