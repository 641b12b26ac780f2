//! Tests for layered configuration loading.

use super::*;
use crate::DEFAULT_BASE_URL;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

fn no_env(_: &str) -> Option<String> {
    None
}

fn options_for(cwd: &Path, user: Option<PathBuf>) -> LayeredConfigOptions {
    let mut options = LayeredConfigOptions::new(cwd);
    options.user_config_path = user;
    options
}

/// A minimal config falls back to the local endpoint.
#[test]
fn parse_minimal_config() {
    let config = ClientConfig::load_from_str("{}").expect("config");
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.ui.tick_rate_ms, 250);
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = ClientConfig::load_from_str("{ unexpected: true }").unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_wrong_field_type() {
    let err = ClientConfig::load_from_str(r#"{ api: { timeout_secs: "soon" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("api.timeout_secs"), "{msg}");
}

#[test]
fn rejects_non_http_base_url() {
    let err = ClientConfig::load_from_str(r#"{ api: { base_url: "ftp://example" } }"#).unwrap_err();
    assert!(format!("{err}").contains("api.base_url"));
}

#[test]
fn trims_trailing_slash_from_base_url() {
    let config =
        ClientConfig::load_from_str(r#"{ api: { base_url: "https://gallery.example/api/v1/" } }"#)
            .expect("config");
    assert_eq!(config.api.base_url, "https://gallery.example/api/v1");
}

/// The cwd layer overrides the user layer key by key.
#[test]
fn cwd_layer_overrides_user_layer() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let user = root.join("home").join(DEFAULT_CONFIG_FILE);
    write_json5(
        &user,
        "{ api: { base_url: \"http://user:1\", timeout_secs: 7 } }",
    );
    let cwd = root.join("work");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ api: { base_url: \"http://cwd:2\" } }",
    );

    let layered =
        ClientConfig::load_layered_with_env(options_for(&cwd, Some(user)), no_env).expect("load");
    assert_eq!(layered.config.api.base_url, "http://cwd:2");
    assert_eq!(layered.config.api.timeout_secs, 7);
    let sources: Vec<_> = layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(sources, vec![ConfigLayerSource::User, ConfigLayerSource::Cwd]);
}

#[test]
fn runtime_layer_wins_over_files_and_env_wins_over_runtime() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let cwd = root.join("work");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ api: { base_url: \"http://cwd:2\", timeout_secs: 3 } }",
    );
    let runtime = root.join("runtime.json5");
    write_json5(&runtime, "{ api: { base_url: \"http://runtime:3\" } }");

    let options = options_for(&cwd, None).with_runtime_path(&runtime);
    let layered = ClientConfig::load_layered_with_env(options.clone(), no_env).expect("load");
    assert_eq!(layered.config.api.base_url, "http://runtime:3");

    let env: HashMap<&str, &str> = HashMap::from([
        (ENV_API_BASE_URL, "http://env:4/"),
        (ENV_API_TIMEOUT_SECS, "9"),
    ]);
    let layered = ClientConfig::load_layered_with_env(options, |name| {
        env.get(name).map(|value| value.to_string())
    })
    .expect("load");
    assert_eq!(layered.config.api.base_url, "http://env:4");
    assert_eq!(layered.config.api.timeout_secs, 9);
    assert_eq!(
        layered.layers.last().map(|layer| layer.source),
        Some(ConfigLayerSource::Env)
    );
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = options_for(temp.path(), None).with_runtime_path(temp.path().join("nope.json5"));
    let err = ClientConfig::load_layered_with_env(options, no_env).unwrap_err();
    assert!(
        matches!(&err, ConfigError::Unreadable { path, .. } if path.ends_with("nope.json5")),
        "{err}"
    );
}

#[test]
fn malformed_layer_names_its_source() {
    let temp = TempDir::new().expect("tmp");
    write_json5(&temp.path().join(DEFAULT_CONFIG_FILE), "{ api: ");
    let err =
        ClientConfig::load_layered_with_env(options_for(temp.path(), None), no_env).unwrap_err();
    match err {
        ConfigError::Syntax { layer, .. } => assert!(layer.starts_with("cwd("), "{layer}"),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn schema_errors_carry_layer_and_path() {
    let err = ClientConfig::load_from_str("{ ui: { refresh: 1 } }").unwrap_err();
    match err {
        ConfigError::Schema { layer, path, .. } => {
            assert_eq!(layer, "config");
            assert_eq!(path, "ui.refresh");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn zero_tick_rate_is_rejected() {
    let err = ClientConfig::load_from_str("{ ui: { tick_rate_ms: 0 } }").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Setting {
            setting: "ui.tick_rate_ms",
            ..
        }
    ));
}

#[test]
fn invalid_env_timeout_is_reported() {
    let temp = TempDir::new().expect("tmp");
    let err = ClientConfig::load_layered_with_env(options_for(temp.path(), None), |name| {
        (name == ENV_API_TIMEOUT_SECS).then(|| "ten".to_string())
    })
    .unwrap_err();
    assert!(
        matches!(
            &err,
            ConfigError::EnvOverride {
                var: ENV_API_TIMEOUT_SECS,
                ..
            }
        ),
        "{err}"
    );
    assert!(format!("{err}").contains("'ten'"));
}

#[test]
fn null_in_later_layer_restores_default() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let user = root.join("user.json5");
    write_json5(&user, "{ api: { timeout_secs: 5 } }");
    write_json5(
        &root.join(DEFAULT_CONFIG_FILE),
        "{ api: { timeout_secs: null } }",
    );

    let layered =
        ClientConfig::load_layered_with_env(options_for(root, Some(user)), no_env).expect("load");
    assert_eq!(layered.config.api.timeout_secs, 30);
}

#[test]
fn no_layers_yields_defaults() {
    let temp = TempDir::new().expect("tmp");
    let layered =
        ClientConfig::load_layered_with_env(options_for(temp.path(), None), no_env).expect("load");
    assert!(layered.layers.is_empty());
    assert_eq!(layered.config, ClientConfig::default());
}
