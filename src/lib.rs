//! Stile - sandboxed static file server with a form login
//!
//! Core library: HTTP parsing and serialization, routing, and the
//! sandboxed file and credential stores.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
pub mod store;
