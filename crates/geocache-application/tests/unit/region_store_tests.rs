//! Region store tests

use crate::support::{region, regions};
use geocache_application::use_cases::RegionStore;
use geocache_domain::error::Error;
use std::num::NonZeroUsize;
use std::time::Duration;

fn store() -> RegionStore {
    RegionStore::new(&regions(), NonZeroUsize::new(2).unwrap(), Duration::from_secs(60)).unwrap()
}

#[test]
fn test_regions_keep_configuration_order() {
    let store = store();
    let names: Vec<&str> = store.regions().iter().map(|r| r.as_str()).collect();
    assert_eq!(names, vec!["us-east", "eu-central", "asia-south"]);
}

#[test]
fn test_empty_region_set_rejected() {
    let result = RegionStore::new(&[], NonZeroUsize::new(2).unwrap(), Duration::from_secs(1));
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_duplicate_region_rejected() {
    let duplicated = vec![region("us-east"), region("us-east")];
    let result = RegionStore::new(&duplicated, NonZeroUsize::new(2).unwrap(), Duration::from_secs(1));
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_resolve() {
    let store = store();
    assert_eq!(store.resolve("eu-central").unwrap().as_str(), "eu-central");
    assert!(matches!(
        store.resolve("mars"),
        Err(Error::UnknownRegion { .. })
    ));
}

#[test]
fn test_regions_are_isolated() {
    let store = store();
    store.apply_change("us-east", "k", "v").unwrap();

    let local = store.with_region("us-east", |cache| cache.get("k").map(str::to_owned));
    let remote = store.with_region("eu-central", |cache| cache.get("k").map(str::to_owned));

    assert_eq!(local.unwrap().as_deref(), Some("v"));
    assert_eq!(remote.unwrap(), None);
}

#[test]
fn test_apply_change_respects_capacity() {
    let store = store();
    store.apply_change("us-east", "a", "1").unwrap();
    store.apply_change("us-east", "b", "2").unwrap();
    store.apply_change("us-east", "c", "3").unwrap();

    let len = store.with_region("us-east", |cache| cache.len()).unwrap();
    assert_eq!(len, 2);
    let stats = store.stats("us-east").unwrap();
    assert_eq!(stats.evictions, 1);
}

#[test]
fn test_apply_payload() {
    let store = store();
    store
        .apply_payload("asia-south", br#"{"key":"user:1","value":"alice","extra":true}"#)
        .unwrap();

    let value = store
        .with_region("asia-south", |cache| cache.get("user:1").map(str::to_owned))
        .unwrap();
    assert_eq!(value.as_deref(), Some("alice"));
}

#[test]
fn test_apply_malformed_payload_leaves_cache_untouched() {
    let store = store();
    let result = store.apply_payload("asia-south", b"{\"key\": 1}");

    assert!(matches!(result, Err(Error::MalformedRecord { .. })));
    assert_eq!(store.with_region("asia-south", |cache| cache.len()).unwrap(), 0);
}

#[test]
fn test_unknown_region_operations_fail() {
    let store = store();
    assert!(store.apply_change("mars", "k", "v").is_err());
    assert!(store.stats("mars").is_err());
}
