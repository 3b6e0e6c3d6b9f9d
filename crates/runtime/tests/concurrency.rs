//! Concurrent actions on shared entities.

mod common;

use std::sync::Arc;

use common::*;
use gotvalis_core::{
    CombatConfig, EffectContext, ItemDefinition, ItemKind, ItemOracle, OffensiveData,
    StatusEffectKind,
};
use gotvalis_runtime::{EntityStore, ItemOracleImpl};

const ATTACKERS: usize = 20;

fn pebble_catalog() -> Arc<dyn ItemOracle> {
    Arc::new(ItemOracleImpl::from_definitions([ItemDefinition::new(
        "pebble",
        "🪨",
        "Caillou",
        ItemKind::Offensive(OffensiveData {
            base_damage: 2,
            crit_chance_pct: 0,
            crit_multiplier_pct: 100,
            applies: None,
        }),
    )]))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_attacks_on_one_target_lose_no_damage() {
    let attackers: Vec<_> = (0..ATTACKERS)
        .map(|i| player(&format!("attacker-{i:02}"), &[("pebble", 1)]))
        .collect();
    let h = Harness::start_with(
        attackers,
        NO_LUCK,
        CombatConfig::default(),
        Some(pebble_catalog()),
    )
    .await;

    let tasks: Vec<_> = (0..ATTACKERS)
        .map(|i| {
            let handle = h.handle.clone();
            tokio::spawn(async move {
                handle
                    .combat()
                    .fight(
                        &id(&format!("attacker-{i:02}")),
                        &id("target"),
                        "pebble",
                        EffectContext::default(),
                    )
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let target = h.entity("target").await;
    assert_eq!(target.stats.damage_taken, 2 * ATTACKERS as u64);
    assert_eq!(target.combat.hp, 100 - 2 * ATTACKERS as u32);

    h.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sweep_and_attack_on_the_same_entity_both_land() {
    let target = with_effect(player("target", &[]), StatusEffectKind::Poison, T0);
    let h = Harness::start_with(
        [player("attacker", &[("pebble", 1)]), target],
        NO_LUCK,
        CombatConfig::default(),
        Some(pebble_catalog()),
    )
    .await;
    h.clock.set(T0.plus(1800));

    let sweep = {
        let handle = h.handle.clone();
        tokio::spawn(async move { handle.sweep_now().await })
    };
    let fight = {
        let handle = h.handle.clone();
        tokio::spawn(async move {
            handle
                .combat()
                .fight(
                    &id("attacker"),
                    &id("target"),
                    "pebble",
                    EffectContext::default(),
                )
                .await
        })
    };

    let report = sweep.await.unwrap().unwrap();
    fight.await.unwrap().unwrap();
    assert_eq!(report.ticks_applied, 1);

    let stored = h.store.get(&id("target")).await.unwrap().unwrap();
    // 1 poison tick + 2 pebble damage (reduced 10 % then floored to 1).
    assert_eq!(stored.combat.hp, 100 - 1 - 1);
    assert_eq!(stored.economy.coins, 1);

    h.stop().await;
}
