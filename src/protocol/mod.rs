//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Framed, JSON bodies)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Kind (1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Requests
//! - 0x01: ADD    - Payload: JSON message
//! - 0x02: GET    - Payload: query (`applicationId=1`, `sessionId=s1`, `messageId=m1`)
//! - 0x03: DELETE - Payload: query
//! - 0x04: PING   - Payload: empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         JSON body           │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK          (200)
//! - 0x01: BAD_REQUEST (400)
//! - 0x02: NOT_FOUND   (404)
//! - 0x03: ERROR       (500)

mod codec;
mod request;
mod response;

pub use codec::{
    decode_request, decode_response, encode_request, encode_response, read_request,
    read_response, write_request, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
pub use request::{Request, RequestKind};
pub use response::{Response, Status};
