//! Composition root tests

use geocache_infrastructure::config::{AppConfig, TransportProvider};
use geocache_infrastructure::di::{geo_cache_options, init_app};
use std::time::Duration;

#[test]
fn test_options_follow_config() {
    let mut config = AppConfig::default();
    config.cache.capacity = 5;
    config.cache.ttl_secs = 9;
    config.transport.restart_backoff_ms = 40;

    let options = geo_cache_options(&config);

    assert_eq!(options.capacity, 5);
    assert_eq!(options.ttl, Duration::from_secs(9));
    assert_eq!(options.breaker.max_failures, 3);
    assert_eq!(options.restart_backoff, Duration::from_millis(40));
}

#[tokio::test]
async fn test_init_app_replicates_over_tokio_transport() {
    let context = init_app(AppConfig::default()).await.unwrap();
    let cache = context.cache();

    cache.put("user:1", "alice", "us-east").await.unwrap();
    assert_eq!(cache.get("user:1", "us-east").unwrap().as_deref(), Some("alice"));

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while cache.get("user:1", "asia-south").unwrap().is_none() {
        assert!(tokio::time::Instant::now() < deadline, "replication timed out");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(cache.get("user:1", "eu-central").unwrap().as_deref(), Some("alice"));

    assert!(context.shutdown_with_timeout(Duration::from_secs(1)).await);
}

#[tokio::test]
async fn test_init_app_with_null_transport_stays_local() {
    let mut config = AppConfig::default();
    config.transport.provider = TransportProvider::Null;
    let context = init_app(config).await.unwrap();
    let cache = context.cache();

    cache.put("k", "v", "eu-central").await.unwrap();

    assert_eq!(cache.get("k", "eu-central").unwrap().as_deref(), Some("v"));
    assert_eq!(cache.get("k", "us-east").unwrap(), None);
    assert_eq!(cache.bus().transport().provider_name(), "null");
    assert!(context.shutdown_with_timeout(Duration::from_secs(1)).await);
}

#[tokio::test]
async fn test_init_app_rejects_invalid_region() {
    let mut config = AppConfig::default();
    config.regions = vec!["bad region".into()];
    assert!(init_app(config).await.is_err());
}
