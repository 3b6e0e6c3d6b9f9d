//! Store write failures during player actions.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::*;
use gotvalis_core::{CombatConfig, EffectContext, Entity, EntityId};
use gotvalis_runtime::{EntityStore, FieldDelta, InMemoryEntityStore, ManualClock, RepositoryError};

/// Store that refuses counter increments and, optionally, writes of one id.
struct WriteFaults {
    inner: InMemoryEntityStore,
    read_only: Option<EntityId>,
}

impl WriteFaults {
    fn new(entities: impl IntoIterator<Item = Entity>, read_only: Option<&str>) -> Self {
        Self {
            inner: InMemoryEntityStore::with_entities(entities),
            read_only: read_only.map(EntityId::new),
        }
    }
}

fn disk_full() -> RepositoryError {
    RepositoryError::Io(std::io::Error::other("disk full"))
}

#[async_trait]
impl EntityStore for WriteFaults {
    async fn get(&self, id: &EntityId) -> Result<Option<Entity>, RepositoryError> {
        self.inner.get(id).await
    }

    async fn upsert(&self, entity: &Entity) -> Result<Entity, RepositoryError> {
        if self.read_only.as_ref() == Some(&entity.id) {
            return Err(disk_full());
        }
        self.inner.upsert(entity).await
    }

    async fn find_all_with_active_effects(&self) -> Result<Vec<Entity>, RepositoryError> {
        self.inner.find_all_with_active_effects().await
    }

    async fn increment_fields(
        &self,
        _id: &EntityId,
        _deltas: &[FieldDelta],
    ) -> Result<Entity, RepositoryError> {
        Err(disk_full())
    }

    async fn delete(&self, id: &EntityId) -> Result<bool, RepositoryError> {
        self.inner.delete(id).await
    }

    async fn list_ids(&self) -> Result<Vec<EntityId>, RepositoryError> {
        self.inner.list_ids().await
    }
}

async fn runtime_over(store: Arc<WriteFaults>) -> gotvalis_runtime::Runtime {
    build(
        store,
        Arc::new(ManualClock::new(T0)),
        NO_LUCK,
        CombatConfig::default(),
        None,
    )
    .await
}

#[tokio::test]
async fn fight_credit_is_stored_with_the_attacker_record() {
    let store = Arc::new(WriteFaults::new([player("a", &[("bomb", 1)])], None));
    let runtime = runtime_over(store.clone()).await;

    let outcome = runtime
        .handle()
        .combat()
        .fight(&id("a"), &id("b"), "bomb", EffectContext::default())
        .await
        .unwrap();
    assert_eq!(outcome.final_damage, 40);

    let a = store.get(&id("a")).await.unwrap().unwrap();
    assert_eq!(a.inventory.count("bomb"), 0);
    assert_eq!(a.economy.coins, 40);
    assert_eq!(a.stats.damage_dealt, 40);
    assert_eq!(store.get(&id("b")).await.unwrap().unwrap().combat.hp, 60);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn failed_target_write_never_stores_free_damage() {
    let store = Arc::new(WriteFaults::new([player("a", &[("bomb", 1)])], Some("b")));
    let runtime = runtime_over(store.clone()).await;

    let err = runtime
        .handle()
        .combat()
        .fight(&id("a"), &id("b"), "bomb", EffectContext::default())
        .await
        .unwrap_err();
    assert!(!err.is_rejection());

    assert!(store.get(&id("b")).await.unwrap().is_none());
    let a = store.get(&id("a")).await.unwrap().unwrap();
    assert_eq!(a.inventory.count("bomb"), 0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn heal_credit_is_stored_with_the_healer_record() {
    let mut patient = player("patient", &[]);
    patient.combat.hp = 50;
    let store = Arc::new(WriteFaults::new(
        [player("medic", &[("potion", 1)]), patient],
        None,
    ));
    let runtime = runtime_over(store.clone()).await;

    runtime
        .handle()
        .combat()
        .heal(&id("medic"), Some(&id("patient")), "potion", EffectContext::default())
        .await
        .unwrap();

    let medic = store.get(&id("medic")).await.unwrap().unwrap();
    assert_eq!(medic.economy.coins, 25);
    assert_eq!(medic.stats.healing_done, 25);
    assert_eq!(store.get(&id("patient")).await.unwrap().unwrap().combat.hp, 75);

    runtime.shutdown().await.unwrap();
}
