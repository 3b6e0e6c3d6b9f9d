//! Periodic status-effect ticks.

use crate::config::CombatConfig;
use crate::error::CombatError;
use crate::state::{DueTick, Entity};
use crate::status::{Polarity, StatusEffectKind};
use crate::time::Timestamp;

use super::damage::apply_damage;
use super::heal::apply_healing;

/// Result of one applied tick, shaped for the tick notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickOutcome {
    pub kind: StatusEffectKind,
    pub polarity: Polarity,
    pub tick_value: u32,
    pub hp_before: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub time_remaining_secs: u64,
    /// True when this tick caused the KO.
    pub knocked_out: bool,
    /// Coins earned by the entity from the tick.
    pub coins: u64,
}

/// Applies a due tick to its bearer.
///
/// The tick has no source, so nobody is credited for it. The bearer earns
/// `tick_value` coins whatever the HP actually changed, including a heal
/// tick on a full-HP entity.
///
/// `last_tick_at` moves to `due.tick_at` before resolution, so a rejected
/// tick is consumed rather than retried on the next sweep.
///
/// # Errors
///
/// [`CombatError::AlreadyKO`] / [`CombatError::CannotHealKO`] when the bearer
/// is KO. No HP or coins change.
pub fn resolve_tick(
    entity: &mut Entity,
    due: &DueTick,
    now: Timestamp,
    config: &CombatConfig,
) -> Result<TickOutcome, CombatError> {
    entity.effects.mark_ticked(due.kind, due.tick_at);

    let hp_before = entity.combat.hp;
    let knocked_out = match due.polarity {
        Polarity::Damage => apply_damage(entity, due.tick_value, None, now, config)?.knocked_out,
        Polarity::Heal => {
            apply_healing(entity, due.tick_value, None, config)?;
            false
        }
    };

    let coins = u64::from(due.tick_value);
    entity.economy.earn(coins);

    let time_remaining_secs = entity
        .effects
        .get(due.kind)
        .map_or(0, |effect| effect.time_remaining(now));

    Ok(TickOutcome {
        kind: due.kind,
        polarity: due.polarity,
        tick_value: due.tick_value,
        hp_before,
        current_hp: entity.combat.hp,
        max_hp: entity.combat.max_hp,
        time_remaining_secs,
        knocked_out,
        coins,
    })
}
