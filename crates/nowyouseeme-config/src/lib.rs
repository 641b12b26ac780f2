//! Client configuration models and layered config loading.
//!
//! Owns the gallery client config schema, its validation, and the merging of
//! user, working-directory, runtime and environment layers.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{
    ConfigLayer, ConfigLayerSource, ENV_API_BASE_URL, ENV_API_TIMEOUT_SECS, LayeredConfig,
    LayeredConfigOptions,
};
/// Configuration schema models.
pub use model::*;
