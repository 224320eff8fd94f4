//! Add-payload validation
//!
//! Checks an incoming JSON payload field by field before a [`Message`] is
//! built from it.

use serde_json::Value;

use crate::message::Message;

/// Expected JSON type of a message field
#[derive(Debug, Clone, Copy)]
enum FieldType {
    Int,
    Str,
    List,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::Str => "str",
            FieldType::List => "list",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Int => value.is_i64(),
            FieldType::Str => value.is_string(),
            FieldType::List => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
        }
    }
}

/// Fields in declaration order; the first failing one is reported
const REQUIRED_FIELDS: [(&str, FieldType); 5] = [
    ("application_id", FieldType::Int),
    ("session_id", FieldType::Str),
    ("message_id", FieldType::Str),
    ("participants", FieldType::List),
    ("content", FieldType::Str),
];

/// Validate a payload and build a Message from it
///
/// Returns the client-facing reason on failure. Non-object payloads fail on
/// the first field, as if every field were missing.
pub fn validate_message(data: &Value) -> Result<Message, String> {
    for (name, field_type) in REQUIRED_FIELDS {
        let Some(value) = data.get(name) else {
            return Err(format!("Missing {}", name));
        };

        if !field_type.matches(value) {
            return Err(format!(
                "Invalid type for {}: {} expected",
                name,
                field_type.name()
            ));
        }
    }

    // Every field is present with the right shape; extra keys are ignored.
    serde_json::from_value::<Message>(data.clone()).map_err(|e| e.to_string())
}
