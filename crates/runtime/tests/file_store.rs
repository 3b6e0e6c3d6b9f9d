//! Runtime over the JSON file store.

mod common;

use std::sync::Arc;

use common::*;
use gotvalis_core::{CombatConfig, EffectContext, StatusEffectKind};
use gotvalis_runtime::{EntityStore, FileEntityStore, ManualClock};
use tempfile::TempDir;

#[tokio::test]
async fn actions_and_ticks_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(T0));

    {
        let store = Arc::new(FileEntityStore::new(dir.path()).await.unwrap());
        store
            .upsert(&player("pyro", &[("flame", 2)]))
            .await
            .unwrap();

        let runtime = build(
            store,
            clock.clone(),
            NO_LUCK,
            CombatConfig::default(),
            None,
        )
        .await;
        runtime
            .handle()
            .combat()
            .fight(
                &id("pyro"),
                &id("target"),
                "flame",
                EffectContext::channel("c-1", "g-1"),
            )
            .await
            .unwrap();
        runtime.shutdown().await.unwrap();
    }

    let store = Arc::new(FileEntityStore::new(dir.path()).await.unwrap());
    let target = store.get(&id("target")).await.unwrap().unwrap();
    assert_eq!(target.combat.hp, 75);
    assert!(target.effects.has_active(StatusEffectKind::Burn, T0));

    let pyro = store.get(&id("pyro")).await.unwrap().unwrap();
    assert_eq!(pyro.inventory.count("flame"), 1);
    assert_eq!(pyro.economy.coins, 25);

    let runtime = build(store.clone(), clock, NO_LUCK, CombatConfig::default(), None).await;
    let report = runtime.handle().sweep_at(T0.plus(900)).await.unwrap();
    assert_eq!(report.ticks_applied, 1);

    let target = store.get(&id("target")).await.unwrap().unwrap();
    assert_eq!(target.combat.hp, 74);
    assert_eq!(target.economy.coins, 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unreadable_records_count_as_sweep_failures() {
    let dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new(T0));
    let store = Arc::new(FileEntityStore::new(dir.path()).await.unwrap());
    store
        .upsert(&with_effect(player("sick", &[]), StatusEffectKind::Poison, T0))
        .await
        .unwrap();
    std::fs::write(dir.path().join("entity_broken.json"), b"{ not json").unwrap();

    let runtime = build(store.clone(), clock, NO_LUCK, CombatConfig::default(), None).await;
    let report = runtime.handle().sweep_at(T0.plus(1800)).await.unwrap();

    assert_eq!(report.entities_scanned, 2);
    assert_eq!(report.failures, 1);
    assert_eq!(report.ticks_applied, 1);
    assert_eq!(store.get(&id("sick")).await.unwrap().unwrap().combat.hp, 99);

    runtime.shutdown().await.unwrap();
}
