//! Configuration loading and validation tests

use geocache_domain::error::Error;
use geocache_infrastructure::config::loader::validate_app_config;
use geocache_infrastructure::config::{AppConfig, ConfigLoader, TransportProvider};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.regions, vec!["us-east", "eu-central", "asia-south"]);
    assert_eq!(config.cache.capacity, 100);
    assert_eq!(config.cache.ttl_secs, 300);
    assert_eq!(config.resilience.breaker_max_failures, 3);
    assert_eq!(config.resilience.breaker_reset_secs, 60);
    assert_eq!(config.transport.provider, TransportProvider::Tokio);
    assert_eq!(config.transport.capacity, 1024);
    assert_eq!(config.transport.subject_prefix, "geocache.regions");
    assert_eq!(config.transport.restart_backoff(), Duration::from_millis(250));
    assert!(config.transport.nats_url.is_none());
    assert_eq!(config.logging.level, "info");
    assert!(validate_app_config(&config).is_ok());
}

#[test]
fn test_breaker_settings_follow_resilience_section() {
    let mut config = AppConfig::default();
    config.resilience.breaker_max_failures = 7;
    config.resilience.breaker_reset_secs = 5;

    let breaker = config.resilience.breaker();
    assert_eq!(breaker.max_failures, 7);
    assert_eq!(breaker.reset_after, Duration::from_secs(5));
}

#[test]
fn test_load_from_toml_file() {
    let file = write_config(
        r#"
regions = ["north", "south"]

[cache]
capacity = 10
ttl_secs = 30

[transport]
provider = "null"
"#,
    );

    let config = ConfigLoader::new().with_config_path(file.path()).load().unwrap();

    assert_eq!(config.regions, vec!["north", "south"]);
    assert_eq!(config.cache.capacity, 10);
    assert_eq!(config.cache.ttl_secs, 30);
    assert_eq!(config.transport.provider, TransportProvider::Null);
    // untouched sections keep their defaults
    assert_eq!(config.resilience.breaker_max_failures, 3);
    assert_eq!(config.transport.capacity, 1024);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loader = ConfigLoader::new().with_config_path(dir.path().join("absent.toml"));

    let config = loader.load().unwrap();

    assert_eq!(config.cache.capacity, 100);
    assert!(loader.config_path().is_some());
}

#[test]
fn test_invalid_file_values_rejected() {
    let file = write_config("[cache]\ncapacity = 0\n");
    let result = ConfigLoader::new().with_config_path(file.path()).load();
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_unknown_provider_rejected() {
    let file = write_config("[transport]\nprovider = \"rabbit\"\n");
    let result = ConfigLoader::new().with_config_path(file.path()).load();
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_validation_rejects_bad_regions() {
    let mut config = AppConfig::default();
    config.regions.clear();
    assert!(validate_app_config(&config).is_err());

    config.regions = vec!["us-east".into(), " us-east ".into()];
    assert!(validate_app_config(&config).is_err());

    config.regions = vec!["us east".into()];
    assert!(validate_app_config(&config).is_err());

    config.regions = vec!["  ".into()];
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_validation_rejects_zero_values() {
    let mut config = AppConfig::default();
    config.cache.ttl_secs = 0;
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.resilience.breaker_max_failures = 0;
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.resilience.breaker_reset_secs = 0;
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.transport.capacity = 0;
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_validation_requires_nats_url() {
    let mut config = AppConfig::default();
    config.transport.provider = TransportProvider::Nats;
    assert!(validate_app_config(&config).is_err());

    config.transport.nats_url = Some("nats://localhost:4222".into());
    assert!(validate_app_config(&config).is_ok());
}

#[test]
fn test_validation_rejects_bad_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "loud".into();
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geocache.toml");
    let mut config = AppConfig::default();
    config.regions = vec!["alpha".into(), "beta".into()];
    config.cache.capacity = 42;

    let loader = ConfigLoader::new();
    loader.save_to_file(&config, &path).unwrap();
    let loaded = ConfigLoader::new().with_config_path(&path).load().unwrap();

    assert_eq!(loaded.regions, vec!["alpha", "beta"]);
    assert_eq!(loaded.cache.capacity, 42);
}

#[test]
fn test_region_names_are_parsed() {
    let config = AppConfig::default();
    let names = config.region_names().unwrap();
    assert_eq!(names.len(), 3);
    assert_eq!(names[1].as_str(), "eu-central");
}
