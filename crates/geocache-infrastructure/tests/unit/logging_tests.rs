//! Logging Tests

use geocache_domain::error::Error;
use geocache_infrastructure::constants::DEFAULT_LOG_LEVEL;
use geocache_infrastructure::logging::{LoggingConfig, init_logging, parse_log_level};
use tracing::Level;

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warn").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);

    assert!(parse_log_level("invalid").is_err());
}

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, DEFAULT_LOG_LEVEL);
    assert!(!config.json_format);
    assert!(config.file_output.is_none());
}

#[test]
fn test_init_logging_rejects_unknown_level() {
    let config = LoggingConfig {
        level: "verbose".to_string(),
        ..LoggingConfig::default()
    };
    assert!(matches!(
        init_logging(config),
        Err(Error::Configuration { .. })
    ));
}

#[test]
fn test_init_logging_installs_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoggingConfig {
        json_format: true,
        file_output: Some(dir.path().join("geocache.log")),
        ..LoggingConfig::default()
    };

    init_logging(config.clone()).unwrap();
    tracing::info!("written to the rolling file");

    // a second global subscriber is refused
    assert!(matches!(
        init_logging(config),
        Err(Error::Configuration { .. })
    ));
}
