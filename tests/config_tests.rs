//! Config Tests
//!
//! Tests for backend parsing and engine selection through `store::open`.

mod common;

use std::str::FromStr;

use common::message;
use msgstore::config::SyncMode;
use msgstore::{store, Backend, Config};
use tempfile::TempDir;

// =============================================================================
// Backend Parsing Tests
// =============================================================================

#[test]
fn test_backend_from_str() {
    for (input, expected) in [
        ("memory", Backend::Memory),
        ("mem", Backend::Memory),
        ("MEMORY", Backend::Memory),
        ("durable", Backend::Durable),
        ("disk", Backend::Durable),
        ("Durable", Backend::Durable),
    ] {
        assert_eq!(Backend::from_str(input).unwrap(), expected, "{}", input);
    }
}

#[test]
fn test_backend_from_str_rejects_unknown() {
    for input in ["", "sqlite", "memory "] {
        let err = Backend::from_str(input).unwrap_err();
        assert!(err.contains("unknown backend"), "{}", err);
    }
}

#[test]
fn test_backend_display_parses_back() {
    for backend in [Backend::Memory, Backend::Durable] {
        assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.backend, Backend::Durable);
    assert_eq!(config.sync_mode, SyncMode::Immediate);
    assert_eq!(config.listen_addr, "127.0.0.1:7878");
    assert_eq!(config.worker_threads, 8);
}

// =============================================================================
// Engine Selection Tests
// =============================================================================

#[test]
fn test_open_memory_backend() {
    let config = Config::builder().backend(Backend::Memory).build();

    let store = store::open(&config).unwrap();
    store.add(message(1, "s1", "m1")).unwrap();

    assert_eq!(store.get_by_session_id("s1").unwrap().len(), 1);
    assert_eq!(store.delete_by_application_id(1).unwrap(), 1);
}

#[test]
fn test_open_durable_backend() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data").join("messages.redb");
    let config = Config::builder()
        .backend(Backend::Durable)
        .db_path(&path)
        .sync_mode(SyncMode::Eventual)
        .build();

    {
        let store = store::open(&config).unwrap();
        store.add(message(1, "s1", "m1")).unwrap();
        assert!(path.exists());
    }

    // Reopening through config sees the same file
    let store = store::open(&config).unwrap();
    assert_eq!(store.get_by_message_id("m1").unwrap(), vec![message(1, "s1", "m1")]);
}
