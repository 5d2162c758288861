use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Per-key async mutexes serialising writes to one profile or one project.
///
/// Entries expire after sitting idle; a request holding a guard keeps its
/// `Arc` alive, and every request touches the entry on acquisition, so an
/// entry is never evicted while a writer is waiting on it within the idle window.
#[derive(Clone)]
pub struct OwnerLocks {
    locks: Cache<Uuid, Arc<Mutex<()>>>,
}

impl OwnerLocks {
    pub fn new(idle: Duration) -> Self {
        Self {
            locks: Cache::builder().time_to_idle(idle).build(),
        }
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: Uuid) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with(key, async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

impl Default for OwnerLocks {
    fn default() -> Self {
        Self::new(Duration::from_secs(600))
    }
}
