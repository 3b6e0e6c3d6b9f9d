//! Damage application.

use crate::config::CombatConfig;
use crate::error::CombatError;
use crate::state::{Entity, EntityId};
use crate::time::Timestamp;

use super::result::{DamageOutcome, SourceCredit};

/// Applies `amount` nominal damage to `target`, shield first.
///
/// # Formula
///
/// ```text
/// shield_damage = min(amount, shield)
/// hp_damage     = amount - shield_damage
/// hp            = max(0, hp - hp_damage)
/// ```
///
/// Reaching 0 HP sets the KO flag in the same update, counts a death and
/// applies the death penalty. Counters track the nominal amount, not the HP
/// actually lost.
///
/// `source` is credited only when it differs from the target; status-effect
/// ticks and self-inflicted damage pass `None`.
///
/// # Errors
///
/// [`CombatError::AlreadyKO`] if the target is KO. Nothing is mutated.
pub fn apply_damage(
    target: &mut Entity,
    amount: u32,
    source: Option<&EntityId>,
    now: Timestamp,
    config: &CombatConfig,
) -> Result<DamageOutcome, CombatError> {
    if target.combat.is_ko {
        return Err(CombatError::AlreadyKO {
            entity: target.id.clone(),
        });
    }

    let combat = &mut target.combat;
    let shield_before = combat.shield;
    let hp_before = combat.hp;

    let shield_damage = amount.min(combat.shield);
    combat.shield -= shield_damage;
    let hp_damage = amount - shield_damage;
    combat.hp = combat.hp.saturating_sub(hp_damage);

    let credited = source.filter(|id| **id != target.id);
    let mut credit = SourceCredit::default();

    target.stats.damage_taken = target.stats.damage_taken.saturating_add(u64::from(amount));

    let knocked_out = target.combat.hp == 0;
    let mut death_penalty = 0;
    if knocked_out {
        target.combat.is_ko = true;
        target.combat.last_ko_at = Some(now);
        target.stats.deaths = target.stats.deaths.saturating_add(1);
        death_penalty = target.economy.deduct(config.death_penalty);

        if credited.is_some() {
            credit.kills = 1;
            credit.coins = config.kill_bonus;
        }
    }

    if credited.is_some() {
        credit.damage_dealt = u64::from(amount);
        credit.coins += u64::from(amount) * config.coins_per_damage;
    }

    Ok(DamageOutcome {
        shield_before,
        hp_before,
        shield_damage,
        hp_damage,
        total_damage: amount,
        current_hp: target.combat.hp,
        current_shield: target.combat.shield,
        is_ko: target.combat.is_ko,
        knocked_out,
        death_penalty,
        credit,
    })
}
