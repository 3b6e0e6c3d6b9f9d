#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use gotvalis_core::{
    CombatConfig, EffectContext, Entity, EntityId, ItemOracle, RngOracle, StatusEffectKind,
    Timestamp,
};
use gotvalis_runtime::{
    EntityStore, InMemoryEntityStore, ManualClock, Runtime, RuntimeConfig, RuntimeHandle,
};

pub const T0: Timestamp = Timestamp::from_secs(1_700_000_000);

/// Every d100 roll lands on the same face: 100 never procs, 1 always does.
pub struct Face(pub u32);

impl RngOracle for Face {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0 - 1
    }
}

pub const NO_LUCK: u32 = 100;
pub const ALL_LUCK: u32 = 1;

pub struct Harness {
    pub runtime: Runtime,
    pub handle: RuntimeHandle,
    pub store: Arc<InMemoryEntityStore>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub async fn start(entities: impl IntoIterator<Item = Entity>, face: u32) -> Self {
        Self::start_with(entities, face, CombatConfig::default(), None).await
    }

    pub async fn start_with(
        entities: impl IntoIterator<Item = Entity>,
        face: u32,
        combat: CombatConfig,
        items: Option<Arc<dyn ItemOracle>>,
    ) -> Self {
        let store = Arc::new(InMemoryEntityStore::with_entities(entities));
        let clock = Arc::new(ManualClock::new(T0));
        let runtime = build(store.clone(), clock.clone(), face, combat, items).await;
        let handle = runtime.handle();

        Self {
            runtime,
            handle,
            store,
            clock,
        }
    }

    pub async fn entity(&self, id: &str) -> Entity {
        self.store
            .get(&EntityId::new(id))
            .await
            .expect("store read")
            .unwrap_or_else(|| panic!("entity {id} should be stored"))
    }

    pub async fn stop(self) {
        self.runtime.shutdown().await.expect("clean shutdown");
    }
}

/// Runtime whose background sweep never fires during a test; sweeps are
/// requested explicitly.
pub async fn build(
    store: Arc<dyn EntityStore>,
    clock: Arc<ManualClock>,
    face: u32,
    combat: CombatConfig,
    items: Option<Arc<dyn ItemOracle>>,
) -> Runtime {
    let config = RuntimeConfig {
        combat,
        tick_interval: Duration::from_secs(3600),
        run_initial_sweep: false,
        ..RuntimeConfig::default()
    };

    let mut builder = Runtime::builder()
        .config(config)
        .store(store)
        .clock(clock)
        .rng(Arc::new(Face(face)));
    if let Some(items) = items {
        builder = builder.items(items);
    }
    builder.build().await.expect("runtime should build")
}

pub fn player(id: &str, items: &[(&str, u32)]) -> Entity {
    Entity::new(id, &CombatConfig::default()).with_inventory(items.iter().copied())
}

pub fn with_effect(mut entity: Entity, kind: StatusEffectKind, at: Timestamp) -> Entity {
    entity.effects.apply(kind, at, EffectContext::channel("chan-1", "guild-1"));
    entity
}

pub fn id(raw: &str) -> EntityId {
    EntityId::new(raw)
}
