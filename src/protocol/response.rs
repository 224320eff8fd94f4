//! Response definitions
//!
//! Represents responses to clients. Bodies are always JSON.

use serde::Serialize;
use serde_json::{json, Value};

use crate::message::Message;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    BadRequest = 0x01,
    NotFound = 0x02,
    Error = 0x03,
}

impl Status {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Status::Ok),
            0x01 => Some(Status::BadRequest),
            0x02 => Some(Status::NotFound),
            0x03 => Some(Status::Error),
            _ => None,
        }
    }

    /// HTTP-equivalent status code
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::Error => 500,
        }
    }

    /// HTTP-equivalent reason phrase
    pub fn name(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::Error => "Internal Server Error",
        }
    }
}

/// Error body shape
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: u16,
    name: &'a str,
    description: &'a str,
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// JSON body
    pub body: Vec<u8>,
}

impl Response {
    /// Create an OK response carrying a JSON value
    pub fn ok(body: Value) -> Self {
        Self {
            status: Status::Ok,
            body: body.to_string().into_bytes(),
        }
    }

    /// `{"result": ...}`
    pub fn result(text: &str) -> Self {
        Self::ok(json!({ "result": text }))
    }

    /// `{"messages": [...]}`
    pub fn messages(messages: &[Message]) -> Self {
        Self::ok(json!({ "messages": messages }))
    }

    /// `{"deleted_amount": n}`
    pub fn deleted(amount: usize) -> Self {
        Self::ok(json!({ "deleted_amount": amount }))
    }

    /// Create a BAD_REQUEST response
    pub fn bad_request(description: &str) -> Self {
        Self::failure(Status::BadRequest, description)
    }

    /// Create a NOT_FOUND response
    pub fn not_found(description: &str) -> Self {
        Self::failure(Status::NotFound, description)
    }

    /// Create an ERROR response
    pub fn error(description: &str) -> Self {
        Self::failure(Status::Error, description)
    }

    fn failure(status: Status, description: &str) -> Self {
        let body = ErrorBody {
            code: status.code(),
            name: status.name(),
            description,
        };
        Self {
            status,
            // Serializing a struct of strings and an integer cannot fail
            body: serde_json::to_vec(&body).unwrap_or_default(),
        }
    }

    /// Parse the body as JSON
    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_slice(&self.body)
    }

    /// The `description` field of an error body, if present
    pub fn description(&self) -> Option<String> {
        self.json()
            .ok()?
            .get("description")?
            .as_str()
            .map(str::to_string)
    }
}
