//! Message Service
//!
//! The request-handling layer over a [`DataStore`].
//!
//! ## Responsibilities
//! - Parse selectors and validate add payloads
//! - Pre-check `message_id` uniqueness before adding
//! - Map store results to responses: empty results and zero counts become
//!   NOT_FOUND, store failures become ERROR

use std::sync::Arc;

use serde_json::Value;

use crate::error::StoreError;
use crate::protocol::{Request, Response};
use crate::query::Selector;
use crate::store::DataStore;
use crate::validation::validate_message;

const NO_MESSAGES: &str = "No messages found";

/// Answers protocol requests against an injected store
#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn DataStore>,
}

impl MessageService {
    /// Create a service over the given store
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    /// Route a decoded request to its handler
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::AddMessage { body } => self.add_message(&body),
            Request::GetMessage { query } => self.get_message(&query),
            Request::DeleteMessage { query } => self.delete_message(&query),
            Request::Ping => Response::result("PONG"),
        }
    }

    /// Validate and store one message
    pub fn add_message(&self, body: &[u8]) -> Response {
        let data: Value = match serde_json::from_slice(body) {
            Ok(data) => data,
            Err(_) => return Response::bad_request("Invalid request body: JSON expected"),
        };

        let message = match validate_message(&data) {
            Ok(message) => message,
            Err(reason) => {
                tracing::debug!(%reason, "Rejected add payload");
                return Response::bad_request(&reason);
            }
        };

        match self.store.get_by_message_id(&message.message_id) {
            Ok(existing) if !existing.is_empty() => {
                let err = StoreError::DuplicateKey(message.message_id);
                return Response::bad_request(&err.to_string());
            }
            Ok(_) => {}
            Err(e) => return internal_error(e),
        }

        let message_id = message.message_id.clone();
        match self.store.add(message) {
            Ok(()) => {
                tracing::debug!(%message_id, "Message added");
                Response::result("Message added successfully")
            }
            // Lost a race with a concurrent add of the same id
            Err(e) if e.is_client_error() => Response::bad_request(&e.to_string()),
            Err(e) => internal_error(e),
        }
    }

    /// Fetch messages by one selector
    pub fn get_message(&self, query: &str) -> Response {
        let selector = match Selector::parse(query) {
            Ok(selector) => selector,
            Err(e) => return Response::bad_request(&e.to_string()),
        };

        match self.store.get(&selector) {
            Ok(messages) if messages.is_empty() => Response::not_found(NO_MESSAGES),
            Ok(messages) => {
                tracing::debug!(%selector, found = messages.len(), "Messages fetched");
                Response::messages(&messages)
            }
            Err(e) => internal_error(e),
        }
    }

    /// Delete messages by one selector
    pub fn delete_message(&self, query: &str) -> Response {
        let selector = match Selector::parse(query) {
            Ok(selector) => selector,
            Err(e) => return Response::bad_request(&e.to_string()),
        };

        match self.store.delete(&selector) {
            Ok(0) => Response::not_found(NO_MESSAGES),
            Ok(deleted) => {
                tracing::debug!(%selector, deleted, "Messages deleted");
                Response::deleted(deleted)
            }
            Err(e) => internal_error(e),
        }
    }
}

fn internal_error(e: StoreError) -> Response {
    tracing::error!(error = %e, "Store failure");
    Response::error(&e.to_string())
}
