//! In-memory identity resolver.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::core::IdResolver;
use crate::error::{FulltextResult, ResourceError};

/// An [`IdResolver`] over a registered `(type, logical id) -> pid` map.
///
/// Logical ids that are themselves numeric resolve to the pid with the same
/// value once it is registered with [`register_pid`](Self::register_pid).
#[derive(Debug, Default)]
pub struct MemoryIdResolver {
    by_logical_id: RwLock<HashMap<(String, String), i64>>,
    numeric: RwLock<HashSet<(String, i64)>>,
}

impl MemoryIdResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a client-assigned logical id to a pid.
    pub fn register(&self, resource_type: impl Into<String>, logical_id: impl Into<String>, pid: i64) {
        self.by_logical_id
            .write()
            .insert((resource_type.into(), logical_id.into()), pid);
    }

    /// Registers a server-assigned pid, addressable by its decimal form.
    pub fn register_pid(&self, resource_type: impl Into<String>, pid: i64) {
        self.numeric.write().insert((resource_type.into(), pid));
    }
}

impl IdResolver for MemoryIdResolver {
    fn resolve(&self, resource_type: &str, logical_id: &str) -> FulltextResult<i64> {
        let key = (resource_type.to_string(), logical_id.to_string());
        if let Some(pid) = self.by_logical_id.read().get(&key) {
            return Ok(*pid);
        }

        if let Ok(pid) = logical_id.parse::<i64>() {
            if self.numeric.read().contains(&(key.0, pid)) {
                return Ok(pid);
            }
        }

        Err(ResourceError::NotFound {
            resource_type: resource_type.to_string(),
            id: logical_id.to_string(),
        }
        .into())
    }
}
