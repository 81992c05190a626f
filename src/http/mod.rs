//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: one request per connection, GET and
//! POST only, fixed-length bodies, no keep-alive and no chunked encoding.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine driving parse, route and write
//! - **`parser`**: Parses an incoming request from a byte buffer
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation and the status table
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: MIME type lookup by file extension
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer bytes until one request parses
//!        └──────┬──────┘
//!               │ Request parsed         (malformed → error response)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route to a handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stile::http::connection::{Connection, Timeouts};
//! use tokio::net::TcpListener;
//!
//! let listener = TcpListener::bind("127.0.0.1:8080").await?;
//! loop {
//!     let (socket, _addr) = listener.accept().await?;
//!     let router = Arc::clone(&router);
//!     tokio::spawn(async move {
//!         let mut conn = Connection::new(socket, router, Timeouts::default());
//!         if let Err(e) = conn.run().await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     });
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
