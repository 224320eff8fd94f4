//! Message model
//!
//! The atomic unit of stored data.

use serde::{Deserialize, Serialize};

/// A stored message, uniquely keyed by `message_id`
///
/// Messages are never mutated once stored; the only way to change one is to
/// delete it. The field order here is also the canonical JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Grouping key shared by many messages
    pub application_id: i64,

    /// Grouping key, typically one conversation
    pub session_id: String,

    /// Primary key
    pub message_id: String,

    /// Ordered list of participant names
    pub participants: Vec<String>,

    pub content: String,
}

impl Message {
    pub fn new(
        application_id: i64,
        session_id: impl Into<String>,
        message_id: impl Into<String>,
        participants: Vec<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            application_id,
            session_id: session_id.into(),
            message_id: message_id.into(),
            participants,
            content: content.into(),
        }
    }
}
