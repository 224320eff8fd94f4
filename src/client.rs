//! Blocking TCP client
//!
//! Speaks the framed protocol to a running server. One request in flight at a
//! time per client.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{Result, StoreError};
use crate::message::Message;
use crate::protocol::{read_response, write_request, Request, Response};
use crate::query::Selector;

/// Client connection to a msgstore server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send one request and wait for its response
    pub fn send(&mut self, request: &Request) -> Result<Response> {
        write_request(&mut self.writer, request)?;
        read_response(&mut self.reader)
    }

    /// Add a message
    pub fn add_message(&mut self, message: &Message) -> Result<Response> {
        let body = serde_json::to_vec(message).map_err(|e| StoreError::Codec(e.to_string()))?;
        self.add_raw(body)
    }

    /// Add a message from an arbitrary body (server-side validation applies)
    pub fn add_raw(&mut self, body: impl Into<Vec<u8>>) -> Result<Response> {
        self.send(&Request::AddMessage { body: body.into() })
    }

    /// Get messages by raw query, e.g. `sessionId=s1`
    pub fn get_message(&mut self, query: &str) -> Result<Response> {
        self.send(&Request::GetMessage {
            query: query.to_string(),
        })
    }

    /// Delete messages by raw query
    pub fn delete_message(&mut self, query: &str) -> Result<Response> {
        self.send(&Request::DeleteMessage {
            query: query.to_string(),
        })
    }

    /// Get messages through a typed selector
    pub fn get(&mut self, selector: &Selector) -> Result<Response> {
        self.get_message(&selector.to_query())
    }

    /// Delete messages through a typed selector
    pub fn delete(&mut self, selector: &Selector) -> Result<Response> {
        self.delete_message(&selector.to_query())
    }

    /// Ping the server
    pub fn ping(&mut self) -> Result<Response> {
        self.send(&Request::Ping)
    }
}
