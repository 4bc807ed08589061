mod support;

use std::path::PathBuf;

use support::with_scoped_env;
use transit_engine::algorithms::ProviderFailurePolicy;
use transit_engine::cache::StoreType;
use transit_engine::config::{CONFIG_PATH_VAR, STORE_PATH_VAR, STORE_TYPE_VAR};
use transit_engine::{EngineConfig, EngineError, TransitEngine};

fn write_config(dir: &tempfile::TempDir, body: &str) -> String {
    let path = dir.path().join("transit.toml");
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_defaults_without_any_configuration() {
    let config = with_scoped_env(
        &[
            (CONFIG_PATH_VAR, None),
            (STORE_TYPE_VAR, None),
            (STORE_PATH_VAR, None),
        ],
        EngineConfig::from_env,
    )
    .unwrap();

    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_explicit_config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "[scan]\non_provider_failure = \"skip-day\"\n\n[timing]\nsearch_days = 14\n",
    );

    let config = with_scoped_env(
        &[
            (CONFIG_PATH_VAR, Some(path.as_str())),
            (STORE_TYPE_VAR, None),
            (STORE_PATH_VAR, None),
        ],
        EngineConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.scan.on_provider_failure, ProviderFailurePolicy::SkipDay);
    assert_eq!(config.timing.search_days, 14);
}

#[test]
fn test_store_variables_override_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[store]\ntype = \"memory\"\n");
    let cache_dir = dir.path().join("cache");
    let cache_dir_str = cache_dir.to_string_lossy().into_owned();

    let config = with_scoped_env(
        &[
            (CONFIG_PATH_VAR, Some(path.as_str())),
            (STORE_TYPE_VAR, Some("file")),
            (STORE_PATH_VAR, Some(cache_dir_str.as_str())),
        ],
        EngineConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.store.store_type().unwrap(), StoreType::File);
    assert_eq!(config.store.path, Some(PathBuf::from(&cache_dir)));
}

#[test]
fn test_invalid_override_is_a_configuration_error() {
    let err = with_scoped_env(
        &[(CONFIG_PATH_VAR, None), (STORE_TYPE_VAR, Some("redis"))],
        EngineConfig::from_env,
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let err = with_scoped_env(
        &[(CONFIG_PATH_VAR, Some("/nonexistent/transit.toml"))],
        EngineConfig::from_env,
    )
    .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/transit.toml"));
}

#[tokio::test]
async fn test_engine_from_file_store_config() {
    let dir = tempfile::tempdir().unwrap();
    let toml = format!(
        "[store]\ntype = \"file\"\npath = \"{}\"\nnamespace = \"itest\"\n",
        dir.path().join("store").display()
    );
    let config = EngineConfig::from_toml_str(&toml).unwrap();

    let engine = TransitEngine::from_config(&config).await.unwrap();
    assert_eq!(engine.cache().namespace(), "itest");
    assert!(engine.cache().health_check().await);
    assert!(dir.path().join("store").is_dir());
}

#[tokio::test]
async fn test_file_store_without_path_is_rejected() {
    let config = EngineConfig::from_toml_str("[store]\ntype = \"file\"\n").unwrap();
    let err = TransitEngine::from_config(&config).await.err().unwrap();
    assert!(matches!(err, EngineError::Configuration(_)));
}
