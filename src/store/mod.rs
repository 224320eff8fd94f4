//! Store Module
//!
//! The storage contract and its two interchangeable engines.
//!
//! ## Engines
//! - [`InMemoryStore`]: three coordinated indexes behind one lock (volatile)
//! - [`DurableStore`]: one redb record table plus two secondary multimaps
//!
//! ## Contract
//! - Absence is never an error: empty vectors and zero counts
//! - Adding a colliding `message_id` fails with `DuplicateKey` on both engines
//! - Reads come back ordered by `message_id`
//! - Backing failures propagate unmodified

mod durable;
mod memory;

use std::sync::Arc;

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::message::Message;
use crate::query::Selector;

pub use durable::DurableStore;
pub use memory::InMemoryStore;

/// Operations every store engine implements
pub trait DataStore: Send + Sync {
    /// Store a new message. Fails with `DuplicateKey` if the id is taken.
    fn add(&self, message: Message) -> Result<()>;

    fn get_by_application_id(&self, application_id: i64) -> Result<Vec<Message>>;

    fn get_by_session_id(&self, session_id: &str) -> Result<Vec<Message>>;

    /// Zero or one message
    fn get_by_message_id(&self, message_id: &str) -> Result<Vec<Message>>;

    /// Returns the number of messages removed
    fn delete_by_application_id(&self, application_id: i64) -> Result<usize>;

    /// Returns the number of messages removed
    fn delete_by_session_id(&self, session_id: &str) -> Result<usize>;

    /// Returns 0 or 1
    fn delete_by_message_id(&self, message_id: &str) -> Result<usize>;

    /// Get through whichever index the selector names
    fn get(&self, selector: &Selector) -> Result<Vec<Message>> {
        match selector {
            Selector::ApplicationId(id) => self.get_by_application_id(*id),
            Selector::SessionId(id) => self.get_by_session_id(id),
            Selector::MessageId(id) => self.get_by_message_id(id),
        }
    }

    /// Delete through whichever index the selector names
    fn delete(&self, selector: &Selector) -> Result<usize> {
        match selector {
            Selector::ApplicationId(id) => self.delete_by_application_id(*id),
            Selector::SessionId(id) => self.delete_by_session_id(id),
            Selector::MessageId(id) => self.delete_by_message_id(id),
        }
    }
}

/// Construct the engine selected by `config.backend`
pub fn open(config: &Config) -> Result<Arc<dyn DataStore>> {
    let store: Arc<dyn DataStore> = match config.backend {
        Backend::Memory => Arc::new(InMemoryStore::new()),
        Backend::Durable => Arc::new(DurableStore::open(&config.db_path, config.sync_mode)?),
    };

    tracing::info!(backend = %config.backend, "Store opened");
    Ok(store)
}
