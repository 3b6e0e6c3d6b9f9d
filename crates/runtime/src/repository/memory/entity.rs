use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use gotvalis_core::{Entity, EntityId};

use crate::repository::{EntityStore, FieldDelta, RepositoryError, Result};

/// In-memory implementation of [`EntityStore`].
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    entities: RwLock<HashMap<EntityId, Entity>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `entities`, versions untouched.
    pub fn with_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let entities = entities
            .into_iter()
            .map(|entity| (entity.id.clone(), entity))
            .collect();
        Self {
            entities: RwLock::new(entities),
        }
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn get(&self, id: &EntityId) -> Result<Option<Entity>> {
        let guard = self
            .entities
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(guard.get(id).cloned())
    }

    async fn upsert(&self, entity: &Entity) -> Result<Entity> {
        let mut guard = self
            .entities
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let previous = guard.get(&entity.id).map_or(0, |stored| stored.version);
        let mut stored = entity.clone();
        stored.version = previous.max(entity.version) + 1;
        guard.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_all_with_active_effects(&self) -> Result<Vec<Entity>> {
        let guard = self
            .entities
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(guard
            .values()
            .filter(|entity| !entity.effects.is_empty())
            .cloned()
            .collect())
    }

    async fn increment_fields(&self, id: &EntityId, deltas: &[FieldDelta]) -> Result<Entity> {
        let mut guard = self
            .entities
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let entity = guard
            .get_mut(id)
            .ok_or_else(|| RepositoryError::MissingEntity(id.clone()))?;
        for delta in deltas {
            delta.apply(entity);
        }
        entity.version += 1;
        Ok(entity.clone())
    }

    async fn delete(&self, id: &EntityId) -> Result<bool> {
        let mut guard = self
            .entities
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(guard.remove(id).is_some())
    }

    async fn list_ids(&self) -> Result<Vec<EntityId>> {
        let guard = self
            .entities
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<_> = guard.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
