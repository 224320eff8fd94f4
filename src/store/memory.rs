//! In-memory store
//!
//! Three coordinated indexes over one record arena, guarded by a single
//! RwLock so every mutation touches all three in one critical section.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;

use crate::error::{Result, StoreError};
use crate::message::Message;

use super::DataStore;

/// The three indexes. Only `records` owns messages; the secondary indexes
/// hold message ids in sorted order.
#[derive(Debug, Default)]
struct Indexes {
    /// message_id → message (one-to-one, the arena)
    records: HashMap<String, Message>,

    /// application_id → message ids (one-to-many)
    by_application: HashMap<i64, BTreeSet<String>>,

    /// session_id → message ids (one-to-many)
    by_session: HashMap<String, BTreeSet<String>>,
}

impl Indexes {
    fn insert(&mut self, message: Message) -> Result<()> {
        if self.records.contains_key(&message.message_id) {
            return Err(StoreError::DuplicateKey(message.message_id));
        }

        self.by_application
            .entry(message.application_id)
            .or_default()
            .insert(message.message_id.clone());
        self.by_session
            .entry(message.session_id.clone())
            .or_default()
            .insert(message.message_id.clone());
        self.records.insert(message.message_id.clone(), message);

        Ok(())
    }

    /// Remove one record from all three indexes
    ///
    /// The only removal path. Emptied secondary slots stay as empty sets.
    fn unlink(&mut self, message_id: &str) -> Option<Message> {
        let message = self.records.remove(message_id)?;

        if let Some(ids) = self.by_application.get_mut(&message.application_id) {
            ids.remove(message_id);
        }
        if let Some(ids) = self.by_session.get_mut(&message.session_id) {
            ids.remove(message_id);
        }

        Some(message)
    }

    fn collect(&self, ids: Option<&BTreeSet<String>>) -> Vec<Message> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.records.get(id).cloned())
            .collect()
    }

    fn unlink_all(&mut self, ids: Vec<String>) -> usize {
        ids.iter().filter(|id| self.unlink(id).is_some()).count()
    }
}

/// Volatile store engine
///
/// ## Concurrency:
/// - Reads share the lock
/// - `add` and every delete hold the write lock for the whole multi-index update
#[derive(Debug, Default)]
pub struct InMemoryStore {
    indexes: RwLock<Indexes>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.indexes.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DataStore for InMemoryStore {
    fn add(&self, message: Message) -> Result<()> {
        tracing::trace!(message_id = %message.message_id, "memory add");
        self.indexes.write().insert(message)
    }

    fn get_by_application_id(&self, application_id: i64) -> Result<Vec<Message>> {
        let indexes = self.indexes.read();
        Ok(indexes.collect(indexes.by_application.get(&application_id)))
    }

    fn get_by_session_id(&self, session_id: &str) -> Result<Vec<Message>> {
        let indexes = self.indexes.read();
        Ok(indexes.collect(indexes.by_session.get(session_id)))
    }

    fn get_by_message_id(&self, message_id: &str) -> Result<Vec<Message>> {
        let indexes = self.indexes.read();
        Ok(indexes.records.get(message_id).cloned().into_iter().collect())
    }

    fn delete_by_application_id(&self, application_id: i64) -> Result<usize> {
        let mut indexes = self.indexes.write();
        let ids: Vec<String> = indexes
            .by_application
            .get(&application_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default();

        let removed = indexes.unlink_all(ids);
        tracing::trace!(application_id, removed, "memory delete by application");
        Ok(removed)
    }

    fn delete_by_session_id(&self, session_id: &str) -> Result<usize> {
        let mut indexes = self.indexes.write();
        let ids: Vec<String> = indexes
            .by_session
            .get(session_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default();

        let removed = indexes.unlink_all(ids);
        tracing::trace!(session_id, removed, "memory delete by session");
        Ok(removed)
    }

    fn delete_by_message_id(&self, message_id: &str) -> Result<usize> {
        let removed = usize::from(self.indexes.write().unlink(message_id).is_some());
        tracing::trace!(message_id, removed, "memory delete by message");
        Ok(removed)
    }
}
