//! Durable store
//!
//! One redb database file holding a single record table keyed by
//! `message_id`, plus two multimap tables indexing it by application id and
//! session id.
//!
//! ## Layout
//! ```text
//! messages                  message_id → (application_id, session_id, participants, content)
//! messages_by_application   application_id ⇉ message_id
//! messages_by_session       session_id ⇉ message_id
//! ```
//!
//! `participants` is stored as one bincode-encoded byte column, which keeps
//! element order and exact string values.
//!
//! Every write runs in exactly one write transaction, so the record table and
//! both indexes change together or not at all.

use std::fs;
use std::path::{Path, PathBuf};

use redb::{
    Database, Durability, MultimapTableDefinition, ReadTransaction, ReadableTable,
    TableDefinition, WriteTransaction,
};

use crate::config::SyncMode;
use crate::error::{Result, StoreError};
use crate::message::Message;

use super::DataStore;

/// (application_id, session_id, participants, content)
type Row<'a> = (i64, &'a str, &'a [u8], &'a str);

const MESSAGES: TableDefinition<&str, (i64, &str, &[u8], &str)> =
    TableDefinition::new("messages");

const BY_APPLICATION: MultimapTableDefinition<i64, &str> =
    MultimapTableDefinition::new("messages_by_application");

const BY_SESSION: MultimapTableDefinition<&str, &str> =
    MultimapTableDefinition::new("messages_by_session");

/// Persistent store engine
///
/// Owns exactly one database handle for its lifetime. The handle is released
/// by [`DurableStore::close`] or on drop. redb serializes writers and gives
/// readers consistent snapshots, so one instance may be shared across threads.
pub struct DurableStore {
    db: Database,
    path: PathBuf,
    durability: Durability,
}

impl DurableStore {
    /// Open or create the database file at `path`
    ///
    /// Creates parent directories and all three tables if missing.
    pub fn open(path: &Path, sync_mode: SyncMode) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(path)?;

        // Tables must exist before the first read transaction opens them
        let txn = db.begin_write()?;
        {
            txn.open_table(MESSAGES)?;
            txn.open_multimap_table(BY_APPLICATION)?;
            txn.open_multimap_table(BY_SESSION)?;
        }
        txn.commit()?;

        tracing::debug!(path = %path.display(), ?sync_mode, "Durable store opened");

        Ok(Self {
            db,
            path: path.to_path_buf(),
            durability: match sync_mode {
                SyncMode::Immediate => Durability::Immediate,
                SyncMode::Eventual => Durability::Eventual,
            },
        })
    }

    /// Release the database handle
    pub fn close(self) -> Result<()> {
        tracing::debug!(path = %self.path.display(), "Durable store closed");
        drop(self.db);
        Ok(())
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn begin_write(&self) -> Result<WriteTransaction> {
        let mut txn = self.db.begin_write()?;
        txn.set_durability(self.durability);
        Ok(txn)
    }

    /// Insert the row and both index entries. Returns false on a key collision.
    fn insert_row(txn: &WriteTransaction, message: &Message) -> Result<bool> {
        let mut messages = txn.open_table(MESSAGES)?;
        if messages.get(message.message_id.as_str())?.is_some() {
            return Ok(false);
        }

        let participants = encode_participants(&message.participants)?;
        messages.insert(
            message.message_id.as_str(),
            (
                message.application_id,
                message.session_id.as_str(),
                participants.as_slice(),
                message.content.as_str(),
            ),
        )?;

        txn.open_multimap_table(BY_APPLICATION)?
            .insert(message.application_id, message.message_id.as_str())?;
        txn.open_multimap_table(BY_SESSION)?
            .insert(message.session_id.as_str(), message.message_id.as_str())?;

        Ok(true)
    }

    /// Materialize every message whose id is listed, in id order
    ///
    /// Takes the caller's transaction so index scan and row fetch share one
    /// snapshot.
    fn load_all<'a>(
        txn: &ReadTransaction,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<Message>> {
        let messages = txn.open_table(MESSAGES)?;

        let mut out = Vec::new();
        for id in ids {
            if let Some(row) = messages.get(id)? {
                out.push(decode_row(id, row.value())?);
            }
        }
        Ok(out)
    }
}

impl DataStore for DurableStore {
    fn add(&self, message: Message) -> Result<()> {
        let txn = self.begin_write()?;

        if !Self::insert_row(&txn, &message)? {
            txn.abort()?;
            return Err(StoreError::DuplicateKey(message.message_id));
        }

        txn.commit()?;
        tracing::trace!(message_id = %message.message_id, "durable add");
        Ok(())
    }

    fn get_by_application_id(&self, application_id: i64) -> Result<Vec<Message>> {
        let txn = self.db.begin_read()?;
        let ids = txn
            .open_multimap_table(BY_APPLICATION)?
            .get(application_id)?
            .map(|id| id.map(|guard| guard.value().to_string()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::load_all(&txn, ids.iter().map(String::as_str))
    }

    fn get_by_session_id(&self, session_id: &str) -> Result<Vec<Message>> {
        let txn = self.db.begin_read()?;
        let ids = txn
            .open_multimap_table(BY_SESSION)?
            .get(session_id)?
            .map(|id| id.map(|guard| guard.value().to_string()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::load_all(&txn, ids.iter().map(String::as_str))
    }

    fn get_by_message_id(&self, message_id: &str) -> Result<Vec<Message>> {
        let txn = self.db.begin_read()?;
        Self::load_all(&txn, std::iter::once(message_id))
    }

    fn delete_by_application_id(&self, application_id: i64) -> Result<usize> {
        let txn = self.begin_write()?;
        let removed = {
            let mut messages = txn.open_table(MESSAGES)?;
            let mut by_application = txn.open_multimap_table(BY_APPLICATION)?;
            let mut by_session = txn.open_multimap_table(BY_SESSION)?;

            let ids = by_application
                .remove_all(application_id)?
                .map(|id| id.map(|guard| guard.value().to_string()))
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut removed = 0;
            for id in &ids {
                let session_id = match messages.remove(id.as_str())? {
                    Some(row) => row.value().1.to_string(),
                    None => continue,
                };
                by_session.remove(session_id.as_str(), id.as_str())?;
                removed += 1;
            }
            removed
        };
        txn.commit()?;

        tracing::trace!(application_id, removed, "durable delete by application");
        Ok(removed)
    }

    fn delete_by_session_id(&self, session_id: &str) -> Result<usize> {
        let txn = self.begin_write()?;
        let removed = {
            let mut messages = txn.open_table(MESSAGES)?;
            let mut by_application = txn.open_multimap_table(BY_APPLICATION)?;
            let mut by_session = txn.open_multimap_table(BY_SESSION)?;

            let ids = by_session
                .remove_all(session_id)?
                .map(|id| id.map(|guard| guard.value().to_string()))
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut removed = 0;
            for id in &ids {
                let application_id = match messages.remove(id.as_str())? {
                    Some(row) => row.value().0,
                    None => continue,
                };
                by_application.remove(application_id, id.as_str())?;
                removed += 1;
            }
            removed
        };
        txn.commit()?;

        tracing::trace!(session_id, removed, "durable delete by session");
        Ok(removed)
    }

    fn delete_by_message_id(&self, message_id: &str) -> Result<usize> {
        let txn = self.begin_write()?;
        let removed = {
            let mut messages = txn.open_table(MESSAGES)?;
            let keys = messages
                .remove(message_id)?
                .map(|row| {
                    let (application_id, session_id, _, _) = row.value();
                    (application_id, session_id.to_string())
                });

            match keys {
                Some((application_id, session_id)) => {
                    txn.open_multimap_table(BY_APPLICATION)?
                        .remove(application_id, message_id)?;
                    txn.open_multimap_table(BY_SESSION)?
                        .remove(session_id.as_str(), message_id)?;
                    1
                }
                None => 0,
            }
        };
        txn.commit()?;

        tracing::trace!(message_id, removed, "durable delete by message");
        Ok(removed)
    }
}

// =============================================================================
// Row Codec
// =============================================================================

fn encode_participants(participants: &[String]) -> Result<Vec<u8>> {
    Ok(bincode::serialize(participants)?)
}

fn decode_row(message_id: &str, row: Row<'_>) -> Result<Message> {
    let (application_id, session_id, participants, content) = row;
    let participants: Vec<String> = bincode::deserialize(participants)?;

    Ok(Message {
        application_id,
        session_id: session_id.to_string(),
        message_id: message_id.to_string(),
        participants,
        content: content.to_string(),
    })
}
