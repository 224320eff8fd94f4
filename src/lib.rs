//! # msgstore
//!
//! A message storage service with:
//! - One storage contract ([`DataStore`]) and two interchangeable engines
//! - Lookup and deletion by application id, session id, or message id
//! - Uniqueness of `message_id` enforced by both engines
//! - A framed TCP protocol carrying JSON bodies
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │               (Worker pool, many clients)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   MessageService                             │
//! │      (query parsing, validation, duplicate pre-check)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  dyn DataStore
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │InMemoryStore│          │DurableStore │
//!   │ (3 indexes) │          │   (redb)    │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod message;
pub mod query;
pub mod validation;
pub mod store;
pub mod protocol;
pub mod service;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Backend, Config, SyncMode};
pub use message::Message;
pub use query::Selector;
pub use store::{DataStore, DurableStore, InMemoryStore};
pub use service::MessageService;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of msgstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
