//! Per-node fetch locks
//!
//! Coalesces concurrent fetches of the same parent id: whoever takes the lock
//! first performs the fetch, later callers wait and then find the entry cached.
//! Fetches for different ids never block each other.

use crate::types::NodeId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Per-node async lock manager
pub struct FetchLockManager {
    /// Map from NodeId to the async lock guarding its fetch
    locks: RwLock<HashMap<NodeId, Arc<Mutex<()>>>>,
}

impl FetchLockManager {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the lock for a node
    pub fn get_lock(&self, node_id: &str) -> Arc<Mutex<()>> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(node_id) {
                return lock.clone();
            }
        }

        let mut map = self.locks.write();
        // Another task may have inserted it between the two guards
        map.entry(node_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry for a node once nobody else holds a handle to it.
    ///
    /// Callers must release their own handle first.
    pub fn release(&self, node_id: &str) {
        let mut map = self.locks.write();
        if let Some(lock) = map.get(node_id) {
            if Arc::strong_count(lock) == 1 {
                map.remove(node_id);
            }
        }
    }

    /// Number of lock entries currently tracked
    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FetchLockManager {
    fn default() -> Self {
        Self::new()
    }
}
