//! Per-project provisioning locks.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Named-lock registry keyed by sanitized project name.
///
/// Two requests for the same name serialize on one lock; requests for
/// different names never contend. Locks are created on first use; entries
/// nobody holds are pruned on the next lookup, so the registry stays
/// bounded by in-flight names.
pub struct ProjectLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Lock handle for `name`, created on first use.
    pub fn for_name(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        // Strong count 1 means only the registry holds the Arc: no request
        // is holding or waiting on that lock. Guards borrow their Arc, so a
        // held lock always counts at least 2.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for ProjectLocks {
    fn default() -> Self {
        Self::new()
    }
}
