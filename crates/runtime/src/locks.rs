//! Per-entity async locks.
//!
//! Every read-modify-write of an entity record, whether from a player action
//! or the tick sweep, runs while holding that entity's lock. Actions touching
//! two entities take both locks in id order so concurrent actions cannot
//! deadlock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use gotvalis_core::EntityId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Unused locks are pruned once the table grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Default)]
pub struct EntityLocks {
    locks: Mutex<HashMap<EntityId, Arc<AsyncMutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: &EntityId) -> Arc<AsyncMutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if locks.len() > PRUNE_THRESHOLD {
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }

        Arc::clone(locks.entry(id.clone()).or_default())
    }

    /// Wait for exclusive access to one entity.
    pub async fn lock(&self, id: &EntityId) -> OwnedMutexGuard<()> {
        self.slot(id).lock_owned().await
    }

    /// Wait for exclusive access to several entities, acquired in id order.
    /// Duplicate ids are locked once.
    pub async fn lock_many(&self, ids: &[&EntityId]) -> Vec<OwnedMutexGuard<()>> {
        let mut ordered: Vec<&EntityId> = ids.to_vec();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for id in ordered {
            guards.push(self.lock(id).await);
        }
        guards
    }

    /// Number of ids with a lock slot.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
