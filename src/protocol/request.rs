//! Request definitions
//!
//! Represents requests from clients.

/// Request kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestKind {
    AddMessage = 0x01,
    GetMessage = 0x02,
    DeleteMessage = 0x03,
    Ping = 0x04,
}

impl RequestKind {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(RequestKind::AddMessage),
            0x02 => Some(RequestKind::GetMessage),
            0x03 => Some(RequestKind::DeleteMessage),
            0x04 => Some(RequestKind::Ping),
            _ => None,
        }
    }
}

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Add a message; body is the JSON payload, validated by the service
    AddMessage { body: Vec<u8> },

    /// Get messages matching a query such as `sessionId=s1`
    GetMessage { query: String },

    /// Delete messages matching a query
    DeleteMessage { query: String },

    /// Ping (health check)
    Ping,
}

impl Request {
    /// Get the request kind
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::AddMessage { .. } => RequestKind::AddMessage,
            Request::GetMessage { .. } => RequestKind::GetMessage,
            Request::DeleteMessage { .. } => RequestKind::DeleteMessage,
            Request::Ping => RequestKind::Ping,
        }
    }
}
