//! GeoCache facade tests

use crate::support::{LoopbackTransport, regions, wait_until};
use geocache_application::resilience::BreakerConfig;
use geocache_application::use_cases::{GeoCache, GeoCacheOptions};
use geocache_domain::error::Error;
use std::sync::Arc;
use std::time::Duration;

async fn start(transport: &Arc<LoopbackTransport>, options: GeoCacheOptions) -> GeoCache {
    GeoCache::start(regions(), Arc::clone(transport) as _, options)
        .await
        .unwrap()
}

fn fast_options() -> GeoCacheOptions {
    GeoCacheOptions::default().with_restart_backoff(Duration::from_millis(10))
}

#[test]
fn test_default_options() {
    let options = GeoCacheOptions::default();
    assert_eq!(options.capacity, 100);
    assert_eq!(options.ttl, Duration::from_secs(300));
    assert_eq!(options.breaker.max_failures, 3);
}

#[tokio::test]
async fn test_put_is_visible_locally_at_once() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;

    cache.put("user:1", "alice", "us-east").await.unwrap();

    assert_eq!(cache.get("user:1", "us-east").unwrap().as_deref(), Some("alice"));
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_put_replicates_to_other_regions() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;

    cache.put("user:1", "alice", "us-east").await.unwrap();

    wait_until(|| {
        ["eu-central", "asia-south"]
            .iter()
            .all(|r| cache.get("user:1", r).unwrap().is_some())
    })
    .await;
    assert_eq!(cache.get("user:1", "eu-central").unwrap().as_deref(), Some("alice"));
    assert_eq!(transport.published_to("us-east"), 0);
    assert_eq!(transport.published().len(), 2);
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_last_write_from_one_origin_wins() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;

    for value in ["v1", "v2", "v3"] {
        cache.put("k", value, "eu-central").await.unwrap();
    }

    wait_until(|| cache.get("k", "asia-south").unwrap().as_deref() == Some("v3")).await;
    assert_eq!(cache.get("k", "us-east").unwrap().as_deref(), Some("v3"));
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_concurrent_writes_to_one_key_converge() {
    let transport = Arc::new(LoopbackTransport::new());
    transport.set_slow_publish("\"v1\"", Duration::from_millis(100));
    let cache = Arc::new(start(&transport, fast_options()).await);

    let first = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.put("k", "v1", "us-east").await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    cache.put("k", "v2", "us-east").await.unwrap();
    first.await.unwrap().unwrap();

    wait_until(|| {
        ["eu-central", "asia-south"]
            .iter()
            .all(|r| cache.get("k", r).unwrap().as_deref() == Some("v2"))
    })
    .await;
    assert_eq!(cache.get("k", "us-east").unwrap().as_deref(), Some("v2"));
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_unknown_region_is_rejected() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;

    assert!(matches!(
        cache.put("k", "v", "mars").await,
        Err(Error::UnknownRegion { .. })
    ));
    assert!(matches!(cache.get("k", "mars"), Err(Error::UnknownRegion { .. })));
    assert!(transport.published().is_empty());
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_put_succeeds_when_replication_fails() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;
    transport.set_fail_publish(true);

    cache.put("k", "v", "us-east").await.unwrap();

    assert_eq!(cache.get("k", "us-east").unwrap().as_deref(), Some("v"));
    assert_eq!(cache.breaker().failure_count(), 2);
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_missing_key_is_none() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;

    assert_eq!(cache.get("nope", "asia-south").unwrap(), None);
    assert_eq!(cache.stats("asia-south").unwrap().misses, 1);
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_disconnected_read_falls_back_to_stale() {
    let transport = Arc::new(LoopbackTransport::new());
    let options = fast_options().with_ttl(Duration::from_secs(1));
    let cache = start(&transport, options).await;

    cache.put("k", "v", "us-east").await.unwrap();
    tokio::time::advance(Duration::from_secs(2)).await;

    assert_eq!(cache.get("k", "us-east").unwrap(), None);

    transport.set_connected(false);
    assert_eq!(cache.get("k", "us-east").unwrap().as_deref(), Some("v"));
    assert_eq!(cache.breaker().failure_count(), 1);
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_open_breaker_read_falls_back_to_stale() {
    let transport = Arc::new(LoopbackTransport::new());
    let options = fast_options()
        .with_ttl(Duration::from_secs(1))
        .with_breaker(BreakerConfig::default().with_reset_after(Duration::from_secs(600)));
    let cache = start(&transport, options).await;

    cache.put("k", "v", "us-east").await.unwrap();
    tokio::time::advance(Duration::from_secs(2)).await;
    cache.breaker().open();

    assert_eq!(cache.get("k", "us-east").unwrap().as_deref(), Some("v"));
    assert_eq!(cache.stats("us-east").unwrap().stale_reads, 1);
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_get_stale_ignores_expiry() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;

    cache.put("k", "v", "eu-central").await.unwrap();
    assert_eq!(cache.get_stale("k", "eu-central").unwrap().as_deref(), Some("v"));
    assert_eq!(cache.get_stale("absent", "eu-central").unwrap(), None);
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_malformed_delivery_is_dropped_and_later_records_applied() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;

    transport.inject("asia-south", b"garbage");
    transport.inject("asia-south", br#"{"key":"k","value":"v"}"#);

    wait_until(|| cache.get("k", "asia-south").unwrap().is_some()).await;
    assert_eq!(cache.stats("asia-south").unwrap().entries, 1);
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_on_replicated_change() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;

    cache
        .on_replicated_change(br#"{"key":"k","value":"v"}"#, "eu-central")
        .unwrap();
    assert_eq!(cache.get("k", "eu-central").unwrap().as_deref(), Some("v"));

    let malformed = cache.on_replicated_change(b"[]", "eu-central");
    assert!(matches!(malformed, Err(Error::MalformedRecord { .. })));
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_clear_only_affects_one_region() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;

    cache.on_replicated_change(br#"{"key":"k","value":"v"}"#, "us-east").unwrap();
    cache.on_replicated_change(br#"{"key":"k","value":"v"}"#, "eu-central").unwrap();
    cache.clear("us-east").unwrap();

    assert_eq!(cache.get("k", "us-east").unwrap(), None);
    assert!(cache.get("k", "eu-central").unwrap().is_some());
    cache.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_zero_capacity_rejected() {
    let transport = Arc::new(LoopbackTransport::new());
    let result = GeoCache::start(
        regions(),
        Arc::clone(&transport) as _,
        GeoCacheOptions::default().with_capacity(0),
    )
    .await;
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[tokio::test]
async fn test_one_worker_per_region() {
    let transport = Arc::new(LoopbackTransport::new());
    let cache = start(&transport, fast_options()).await;

    assert_eq!(cache.regions().len(), 3);
    assert_eq!(cache.bus().pool().active_workers(), 3);
    assert!(cache.shutdown(Duration::from_secs(1)).await);
}

#[test]
fn test_geo_cache_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GeoCache>();
}
