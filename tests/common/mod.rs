//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use msgstore::config::SyncMode;
use msgstore::{DataStore, DurableStore, InMemoryStore, Message};
use tempfile::TempDir;

// =============================================================================
// Messages
// =============================================================================

pub fn message(application_id: i64, session_id: &str, message_id: &str) -> Message {
    Message::new(
        application_id,
        session_id,
        message_id,
        vec!["john".to_string(), "jack".to_string()],
        "Hello, world!",
    )
}

/// app 1/s1: m1, m2 · app 1/s2: m3 · app 2/s2: m4 · app 2/s3: m5
pub fn fixture() -> Vec<Message> {
    vec![
        message(1, "s1", "m1"),
        message(1, "s1", "m2"),
        message(1, "s2", "m3"),
        message(2, "s2", "m4"),
        message(2, "s3", "m5"),
    ]
}

pub fn load_fixture(store: &dyn DataStore) {
    for m in fixture() {
        store.add(m).unwrap();
    }
}

pub fn ids(messages: &[Message]) -> Vec<&str> {
    messages.iter().map(|m| m.message_id.as_str()).collect()
}

// =============================================================================
// Stores
// =============================================================================

pub fn temp_durable() -> (TempDir, DurableStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = DurableStore::open(&temp_dir.path().join("messages.redb"), SyncMode::Immediate)
        .unwrap();
    (temp_dir, store)
}

/// Run `check` against a fresh instance of each engine
pub fn for_each_engine(check: impl Fn(&str, &dyn DataStore)) {
    let memory = InMemoryStore::new();
    check("memory", &memory);

    let (_temp, durable) = temp_durable();
    check("durable", &durable);
}

/// Like [`for_each_engine`], handing out shared ownership of each engine
pub fn for_each_shared_engine(check: impl Fn(&str, Arc<dyn DataStore>)) {
    check("memory", Arc::new(InMemoryStore::new()));

    let (_temp, durable) = temp_durable();
    check("durable", Arc::new(durable));
}
