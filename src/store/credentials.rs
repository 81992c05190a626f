//! In-memory username → password table.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

/// Read-only credential table, loaded once at startup.
///
/// Passwords are stored and compared as plain strings. There is no hashing
/// and the comparison is not constant-time.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Loads the table from a file shaped like `{"alice":"secret", ...}`.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read credentials file {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("invalid credentials file {}", path.display()))
    }

    /// Parses a flat JSON object of string keys to string values.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let users: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self { users })
    }

    pub fn from_map(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    /// True only if `username` exists and its password equals `password` exactly.
    pub fn validate(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|stored| stored == password)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
