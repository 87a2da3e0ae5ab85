//! Null transport tests

use futures::StreamExt;
use geocache_domain::ports::ReplicationTransport;
use geocache_domain::value_objects::RegionName;
use geocache_providers::NullTransport;
use std::time::Duration;

#[tokio::test]
async fn test_null_transport_discards_payloads() {
    let transport = NullTransport::new();
    let region = RegionName::new("us-east").unwrap();

    transport.declare(&region).await.unwrap();
    transport.publish(&region, b"ignored").await.unwrap();

    let mut inbound = transport.consume(&region).await.unwrap();
    let next = tokio::time::timeout(Duration::from_millis(20), inbound.next()).await;
    assert!(next.is_err());
    assert!(transport.is_connected());
    assert_eq!(transport.provider_name(), "null");
}
