//! Generation tickets
//!
//! Async actions take a ticket for their key before suspending. When the
//! result comes back it is applied only if no newer action on the same key
//! started in the meantime.

use std::collections::HashMap;

/// Proof that an action was the latest for its key when it started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: String,
    version: u64,
}

impl Ticket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Latest version per action key
#[derive(Debug, Clone, Default)]
pub struct Generations {
    versions: HashMap<String, u64>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new action on `key`, superseding any in flight
    pub fn begin(&mut self, key: &str) -> Ticket {
        let version = self.versions.entry(key.to_string()).or_insert(0);
        *version += 1;
        Ticket {
            key: key.to_string(),
            version: *version,
        }
    }

    /// Whether `ticket` is still the latest for its key
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.versions.get(&ticket.key) == Some(&ticket.version)
    }

    /// Supersede whatever is in flight on `key` without starting anything
    pub fn invalidate(&mut self, key: &str) {
        self.begin(key);
    }
}
