//! Region subject naming tests

use geocache_providers::transport::region_subject;

#[test]
fn test_region_subject_joins_prefix() {
    assert_eq!(
        region_subject("geocache.regions", "eu-central"),
        "geocache.regions.eu-central"
    );
}

#[test]
fn test_region_subject_without_prefix() {
    assert_eq!(region_subject("", "us-east"), "us-east");
}
