//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single non-blocking acceptor loop
//! - Fixed worker thread pool fed over a crossbeam channel
//! - Requests routed through MessageService

mod connection;
mod server;

pub use connection::Connection;
pub use server::{Server, ShutdownHandle};
