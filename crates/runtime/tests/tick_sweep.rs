//! Status-effect sweeps and the effect service.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::*;
use gotvalis_core::{
    CombatConfig, CombatError, EffectContext, Entity, EntityId, Missing, StatusEffectKind,
};
use gotvalis_runtime::{
    EffectEvent, EntityStore, Event, FieldDelta, InMemoryEntityStore, ManualClock,
    RepositoryError, Runtime, RuntimeConfig, Topic,
};

#[tokio::test]
async fn regeneration_ticks_on_its_grid() {
    let mut entity = with_effect(player("regen", &[]), StatusEffectKind::Regeneration, T0);
    entity.combat.hp = 90;
    let h = Harness::start([entity], NO_LUCK).await;
    let mut effects = h.handle.subscribe(Topic::Effects);

    let report = h.handle.sweep_at(T0.plus(1800)).await.unwrap();
    assert_eq!(report.entities_scanned, 1);
    assert_eq!(report.ticks_applied, 1);

    let regen = h.entity("regen").await;
    assert_eq!(regen.combat.hp, 92);
    assert_eq!(regen.economy.coins, 2);
    let instance = regen.effects.get(StatusEffectKind::Regeneration).unwrap();
    assert_eq!(instance.last_tick_at, T0.plus(1800));

    match effects.recv().await.unwrap() {
        Event::Effects(EffectEvent::Tick(tick)) => {
            assert_eq!(tick.kind, StatusEffectKind::Regeneration);
            assert_eq!((tick.hp_before, tick.current_hp), (90, 92));
            assert_eq!(tick.time_remaining_secs, 18_000 - 1_800);
            assert_eq!(tick.route.channel_id.as_deref(), Some("chan-1"));
        }
        other => panic!("unexpected event {other:?}"),
    }

    // Next sweep, 20 s later: nothing due.
    let report = h.handle.sweep_at(T0.plus(1820)).await.unwrap();
    assert_eq!(report.ticks_applied, 0);

    // A late sweep fires once and snaps back onto the grid.
    let report = h.handle.sweep_at(T0.plus(3600 + 700)).await.unwrap();
    assert_eq!(report.ticks_applied, 1);
    let regen = h.entity("regen").await;
    assert_eq!(regen.combat.hp, 94);
    let instance = regen.effects.get(StatusEffectKind::Regeneration).unwrap();
    assert_eq!(instance.last_tick_at, T0.plus(3600));

    h.stop().await;
}

#[tokio::test]
async fn repeated_sweeps_tick_once_per_interval_until_expiry() {
    let entity = with_effect(player("burning", &[]), StatusEffectKind::Burn, T0);
    let h = Harness::start([entity], NO_LUCK).await;

    let early = h.handle.sweep_at(T0.plus(899)).await.unwrap();
    assert_eq!(early.ticks_applied, 0);

    let mut ticks = 0;
    let mut expired = 0;
    for step in 1..=120 {
        let report = h.handle.sweep_at(T0.plus(step * 30)).await.unwrap();
        ticks += report.ticks_applied;
        expired += report.effects_expired;
    }

    // BURN: 1 every 900 s for 3600 s. The tick at 3600 s never happens.
    assert_eq!(ticks, 3);
    assert_eq!(expired, 1);

    let burning = h.entity("burning").await;
    assert_eq!(burning.combat.hp, 97);
    assert_eq!(burning.economy.coins, 3);
    assert!(burning.effects.is_empty());

    let after = h.handle.sweep_at(T0.plus(4000)).await.unwrap();
    assert_eq!(after.entities_scanned, 0);

    h.stop().await;
}

#[tokio::test]
async fn ticks_on_ko_entities_are_consumed_without_pay() {
    let mut entity = with_effect(player("down", &[]), StatusEffectKind::Poison, T0);
    entity.combat.hp = 0;
    entity.combat.is_ko = true;
    let h = Harness::start([entity], NO_LUCK).await;

    let report = h.handle.sweep_at(T0.plus(1800)).await.unwrap();
    assert_eq!(report.ticks_applied, 0);
    assert_eq!(report.ticks_skipped, 1);

    let down = h.entity("down").await;
    assert_eq!(down.combat.hp, 0);
    assert_eq!(down.economy.coins, 0);
    assert_eq!(
        down.effects
            .get(StatusEffectKind::Poison)
            .unwrap()
            .last_tick_at,
        T0.plus(1800)
    );

    h.stop().await;
}

#[tokio::test]
async fn damage_tick_can_knock_out() {
    let mut entity = with_effect(player("fragile", &[]), StatusEffectKind::Virus, T0);
    entity.combat.hp = 5;
    entity.economy.coins = 100;
    let h = Harness::start([entity], NO_LUCK).await;
    let mut effects = h.handle.subscribe(Topic::Effects);

    h.handle.sweep_at(T0.plus(3600)).await.unwrap();

    let fragile = h.entity("fragile").await;
    assert!(fragile.combat.is_ko);
    assert_eq!(fragile.stats.deaths, 1);
    // -25 death penalty, +5 tick income.
    assert_eq!(fragile.economy.coins, 80);

    match effects.recv().await.unwrap() {
        Event::Effects(EffectEvent::Tick(tick)) => assert!(tick.ko),
        other => panic!("unexpected event {other:?}"),
    }

    h.stop().await;
}

/// Store whose reads fail for one entity.
struct FlakyStore {
    inner: InMemoryEntityStore,
    cursed: EntityId,
}

#[async_trait]
impl EntityStore for FlakyStore {
    async fn get(&self, id: &EntityId) -> Result<Option<Entity>, RepositoryError> {
        if *id == self.cursed {
            return Err(RepositoryError::Io(std::io::Error::other("disk on fire")));
        }
        self.inner.get(id).await
    }

    async fn upsert(&self, entity: &Entity) -> Result<Entity, RepositoryError> {
        self.inner.upsert(entity).await
    }

    async fn find_all_with_active_effects(&self) -> Result<Vec<Entity>, RepositoryError> {
        self.inner.find_all_with_active_effects().await
    }

    async fn increment_fields(
        &self,
        id: &EntityId,
        deltas: &[FieldDelta],
    ) -> Result<Entity, RepositoryError> {
        self.inner.increment_fields(id, deltas).await
    }

    async fn delete(&self, id: &EntityId) -> Result<bool, RepositoryError> {
        self.inner.delete(id).await
    }

    async fn list_ids(&self) -> Result<Vec<EntityId>, RepositoryError> {
        self.inner.list_ids().await
    }
}

#[tokio::test]
async fn one_bad_record_does_not_stop_the_sweep() {
    let store = Arc::new(FlakyStore {
        inner: InMemoryEntityStore::with_entities([
            with_effect(player("cursed", &[]), StatusEffectKind::Poison, T0),
            with_effect(player("healthy", &[]), StatusEffectKind::Poison, T0),
        ]),
        cursed: id("cursed"),
    });
    let clock = Arc::new(ManualClock::new(T0));
    let runtime = build(
        store.clone(),
        clock,
        NO_LUCK,
        CombatConfig::default(),
        None,
    )
    .await;

    let report = runtime.handle().sweep_at(T0.plus(1800)).await.unwrap();
    assert_eq!(report.entities_scanned, 2);
    assert_eq!(report.failures, 1);
    assert_eq!(report.ticks_applied, 1);

    let healthy = store.inner.get(&id("healthy")).await.unwrap().unwrap();
    assert_eq!(healthy.combat.hp, 99);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn background_worker_sweeps_on_start() {
    let mut entity = with_effect(
        player("early", &[]),
        StatusEffectKind::Regeneration,
        T0,
    );
    entity.combat.hp = 50;
    let store = Arc::new(InMemoryEntityStore::with_entities([entity]));
    let clock = Arc::new(ManualClock::new(T0.plus(1800)));

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            tick_interval: Duration::from_secs(1),
            run_initial_sweep: true,
            ..RuntimeConfig::default()
        })
        .store(store.clone())
        .clock(clock)
        .build()
        .await
        .unwrap();
    let mut effects = runtime.handle().subscribe(Topic::Effects);

    let event = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(Event::Effects(EffectEvent::Tick(tick))) = effects.recv().await {
                return tick;
            }
        }
    })
    .await
    .expect("initial sweep should tick");
    assert_eq!(event.current_hp, 52);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn effect_service_lifecycle() {
    let h = Harness::start([player("subject", &[])], NO_LUCK).await;
    let effects = h.handle.effects();
    let subject = id("subject");

    let first = effects
        .apply_named(&subject, "regeneration", EffectContext::default())
        .await
        .unwrap();
    assert!(!first.refreshed);

    h.clock.advance(100);
    let second = effects
        .apply(&subject, StatusEffectKind::Regeneration, EffectContext::default())
        .await
        .unwrap();
    assert!(second.refreshed);

    let stored = h.entity("subject").await;
    assert_eq!(stored.effects.len(), 1);
    assert_eq!(
        stored
            .effects
            .get(StatusEffectKind::Regeneration)
            .unwrap()
            .applied_at,
        T0.plus(100)
    );

    let err = effects
        .apply_named(&subject, "plague", EffectContext::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_rejection(),
        Some(CombatError::InvalidEffect { .. })
    ));

    let err = effects
        .apply(&id("ghost"), StatusEffectKind::Burn, EffectContext::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_rejection(),
        Some(CombatError::NotFound(Missing::Entity(_)))
    ));

    let err = effects
        .remove(&subject, StatusEffectKind::Burn)
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_rejection(),
        Some(CombatError::NotFound(Missing::Effect(StatusEffectKind::Burn)))
    ));

    effects
        .apply(&subject, StatusEffectKind::Burn, EffectContext::default())
        .await
        .unwrap();
    let later = T0.plus(100 + 3600);
    let active = effects.list_active(&subject, later).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, StatusEffectKind::Regeneration);
    // Listing is read-only.
    assert_eq!(h.entity("subject").await.effects.len(), 2);

    assert_eq!(effects.cleanup_expired(&subject, later).await.unwrap(), 1);
    assert_eq!(h.entity("subject").await.effects.len(), 1);

    let removed = effects
        .remove(&subject, StatusEffectKind::Regeneration)
        .await
        .unwrap();
    assert_eq!(removed.kind, StatusEffectKind::Regeneration);

    h.stop().await;
}
