//! Query selectors
//!
//! Parses the `key=value` query strings used by get and delete requests into
//! a typed [`Selector`]. Queries are form-urlencoded: `%XX` escapes and `+`
//! are decoded, so ids containing `&`, `=` or spaces stay addressable.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Result, StoreError};

pub const APPLICATION_ID_PARAM: &str = "applicationId";
pub const SESSION_ID_PARAM: &str = "sessionId";
pub const MESSAGE_ID_PARAM: &str = "messageId";

const EXACTLY_ONE: &str =
    "Specify exactly one of the following: applicationId, sessionId, messageId";
const ONE_OF: &str = "Specify one of the following: applicationId, sessionId, messageId";

/// Which index a get or delete addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    ApplicationId(i64),
    SessionId(String),
    MessageId(String),
}

impl Selector {
    /// Parse a query such as `applicationId=1` or `sessionId=s1`
    ///
    /// Exactly one distinct parameter name is accepted. A repeated name keeps
    /// its first value. Values are taken verbatim after decoding.
    pub fn parse(query: &str) -> Result<Self> {
        let mut params: Vec<(Cow<'_, str>, Cow<'_, str>)> = Vec::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if !params.iter().any(|(seen, _)| *seen == key) {
                params.push((key, value));
            }
        }

        let [(key, value)] = params.as_slice() else {
            return Err(StoreError::InvalidRequest(EXACTLY_ONE.to_string()));
        };

        match key.as_ref() {
            APPLICATION_ID_PARAM => value
                .trim()
                .parse::<i64>()
                .map(Selector::ApplicationId)
                .map_err(|_| {
                    StoreError::InvalidRequest("applicationId must be an integer".to_string())
                }),
            SESSION_ID_PARAM => Ok(Selector::SessionId(value.to_string())),
            MESSAGE_ID_PARAM => Ok(Selector::MessageId(value.to_string())),
            _ => Err(StoreError::InvalidRequest(ONE_OF.to_string())),
        }
    }

    /// Render back to the query form accepted by [`Selector::parse`]
    pub fn to_query(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (key, value): (&str, Cow<'_, str>) = match self {
            Selector::ApplicationId(id) => (APPLICATION_ID_PARAM, Cow::Owned(id.to_string())),
            Selector::SessionId(id) => (SESSION_ID_PARAM, Cow::Borrowed(id.as_str())),
            Selector::MessageId(id) => (MESSAGE_ID_PARAM, Cow::Borrowed(id.as_str())),
        };

        let encoded = form_urlencoded::Serializer::new(String::new())
            .append_pair(key, &value)
            .finish();
        f.write_str(&encoded)
    }
}
