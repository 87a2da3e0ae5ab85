//! Error Extension Tests

use geocache_domain::error::{Error, Result};
use geocache_infrastructure::error_ext::ErrorContext;
use std::io;

fn not_found() -> std::result::Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::NotFound, "file not found"))
}

#[test]
fn test_context_wraps_as_infrastructure() {
    let result: Result<()> = not_found().context("failed to read file");

    match result {
        Err(Error::Infrastructure { message, source }) => {
            assert!(message.contains("failed to read file"));
            assert!(message.contains("file not found"));
            assert!(source.is_some());
        }
        other => panic!("Expected Infrastructure error, got {other:?}"),
    }
}

#[test]
fn test_with_context_is_lazy() {
    let ok: std::result::Result<u8, io::Error> = Ok(1);
    let value = ok
        .with_context(|| -> String { panic!("context must not be built on success") })
        .unwrap();
    assert_eq!(value, 1);
}

#[test]
fn test_config_context() {
    let result = not_found().config_context("bad config");
    assert!(matches!(result, Err(Error::Configuration { .. })));
}
