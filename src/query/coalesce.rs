use super::key::QueryKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async lock per query key; holding the guard means "I am the fetcher".
pub struct QueryCoalescer {
    inflight: Mutex<HashMap<QueryKey, Arc<AsyncMutex<()>>>>,
}

impl QueryCoalescer {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    fn inflight(&self) -> MutexGuard<'_, HashMap<QueryKey, Arc<AsyncMutex<()>>>> {
        self.inflight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn acquire(&self, key: &QueryKey) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(
            self.inflight()
                .entry(key.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        );
        lock.lock_owned().await
    }

    /// Drop locks nobody holds or waits on. Holders and waiters keep their
    /// own `Arc`, so a count of one means the map is the only owner.
    pub fn prune(&self) -> usize {
        let mut inflight = self.inflight();
        let before = inflight.len();
        inflight.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - inflight.len()
    }

    pub fn len(&self) -> usize {
        self.inflight().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inflight().is_empty()
    }
}

impl Default for QueryCoalescer {
    fn default() -> Self {
        Self::new()
    }
}
