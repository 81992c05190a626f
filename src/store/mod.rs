//! Process-lifetime state shared by every connection.
//!
//! Both stores are built once at startup and only read afterwards, so they
//! are handed to connection tasks behind an `Arc` without any locking.

pub mod credentials;
pub mod files;

pub use credentials::CredentialStore;
pub use files::{FileError, FileStore};
