//! Errors raised while resolving the gallery client config.

use std::path::PathBuf;
use thiserror::Error;

/// Why a config layer, an override or the merged result was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists (or was required) but could not be read.
    #[error("cannot read config file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A layer is not valid JSON5.
    #[error("{layer} is not valid json5: {source}")]
    Syntax {
        layer: String,
        #[source]
        source: json5::Error,
    },
    /// A layer carries an unknown key or a value of the wrong type.
    #[error("{layer}:{path}: {message}")]
    Schema {
        layer: String,
        path: String,
        message: String,
    },
    /// A `NOWYOUSEEME_*` environment override could not be used.
    #[error("environment override {var}: {message}")]
    EnvOverride { var: &'static str, message: String },
    /// The merged document does not deserialize into `ClientConfig`.
    #[error("config does not match the client schema: {0}")]
    Shape(#[from] serde_json::Error),
    /// A setting holds a value the client cannot work with.
    #[error("{setting} {message}")]
    Setting {
        setting: &'static str,
        message: String,
    },
}
