//! Healing, shield and revive transitions.

use crate::config::CombatConfig;
use crate::error::{CombatError, NoOpReason};
use crate::state::{Entity, EntityId};

use super::result::{HealOutcome, ReviveOutcome, ShieldOutcome, SourceCredit};

/// Restores up to `amount` HP on `target`, capped at max HP.
///
/// The target's `healing_done` counts the actual HP restored. A different
/// `source` earns the same amount as healing done and as coins. A target
/// already at max HP gets `heal_amount == 0`; rejecting that is the caller's
/// decision.
///
/// # Errors
///
/// [`CombatError::CannotHealKO`] if the target is KO.
pub fn apply_healing(
    target: &mut Entity,
    amount: u32,
    source: Option<&EntityId>,
    config: &CombatConfig,
) -> Result<HealOutcome, CombatError> {
    if target.combat.is_ko {
        return Err(CombatError::CannotHealKO {
            entity: target.id.clone(),
        });
    }

    let hp_before = target.combat.hp;
    let heal_amount = amount.min(target.combat.missing_hp());
    target.combat.hp += heal_amount;
    target.stats.healing_done = target
        .stats
        .healing_done
        .saturating_add(u64::from(heal_amount));

    let mut credit = SourceCredit::default();
    if source.is_some_and(|id| *id != target.id) {
        credit.healing_done = u64::from(heal_amount);
        credit.coins = u64::from(heal_amount) * config.coins_per_heal;
    }

    Ok(HealOutcome {
        hp_before,
        heal_amount,
        current_hp: target.combat.hp,
        max_hp: target.combat.max_hp,
        credit,
    })
}

/// Adds up to `amount` shield points, capped at max shield.
///
/// # Errors
///
/// - [`CombatError::CannotHealKO`] if the target is KO
/// - [`CombatError::NoOp`] if nothing would be added
pub fn add_shield(target: &mut Entity, amount: u32) -> Result<ShieldOutcome, CombatError> {
    if target.combat.is_ko {
        return Err(CombatError::CannotHealKO {
            entity: target.id.clone(),
        });
    }

    let shield_added = amount.min(target.combat.missing_shield());
    if shield_added == 0 {
        return Err(CombatError::NoOp(NoOpReason::ShieldFull));
    }

    let shield_before = target.combat.shield;
    target.combat.shield += shield_added;

    Ok(ShieldOutcome {
        shield_before,
        shield_added,
        current_shield: target.combat.shield,
        max_shield: target.combat.max_shield,
    })
}

/// Brings a KO entity back with `revive_hp_pct` of its max HP (at least 1).
///
/// # Errors
///
/// [`CombatError::NotKO`] if the entity is alive.
pub fn revive(target: &mut Entity, config: &CombatConfig) -> Result<ReviveOutcome, CombatError> {
    if !target.combat.is_ko {
        return Err(CombatError::NotKO {
            entity: target.id.clone(),
        });
    }

    let hp = (u64::from(target.combat.max_hp) * u64::from(config.revive_hp_pct) / 100) as u32;
    target.combat.hp = hp.clamp(1, target.combat.max_hp.max(1));
    target.combat.is_ko = false;

    Ok(ReviveOutcome {
        current_hp: target.combat.hp,
        max_hp: target.combat.max_hp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, hp: u32) -> Entity {
        let mut entity = Entity::new(id, &CombatConfig::default());
        entity.combat.hp = hp;
        entity
    }

    #[test]
    fn heal_never_exceeds_max() {
        let config = CombatConfig::default();
        for (hp, amount) in [(90, 25), (100, 10), (1, 99), (50, 0)] {
            let mut target = entity("t", hp);
            let outcome = apply_healing(&mut target, amount, None, &config).unwrap();

            assert!(target.combat.hp <= target.combat.max_hp);
            assert_eq!(outcome.heal_amount, amount.min(100 - hp));
        }
    }

    #[test]
    fn full_target_heals_zero() {
        let mut target = entity("t", 100);
        let outcome = apply_healing(&mut target, 10, None, &CombatConfig::default()).unwrap();
        assert_eq!(outcome.heal_amount, 0);
        assert_eq!(target.stats.healing_done, 0);
    }

    #[test]
    fn healer_is_paid_for_actual_healing() {
        let healer = EntityId::new("healer");
        let mut target = entity("t", 90);

        let outcome =
            apply_healing(&mut target, 25, Some(&healer), &CombatConfig::default()).unwrap();

        assert_eq!(outcome.heal_amount, 10);
        assert_eq!(target.stats.healing_done, 10);
        assert_eq!(outcome.credit.healing_done, 10);
        assert_eq!(outcome.credit.coins, 10);
    }

    #[test]
    fn ko_blocks_heal_and_shield() {
        let mut target = entity("t", 0);
        target.combat.is_ko = true;
        let before = target.clone();

        assert!(matches!(
            apply_healing(&mut target, 10, None, &CombatConfig::default()),
            Err(CombatError::CannotHealKO { .. })
        ));
        assert!(matches!(
            add_shield(&mut target, 10),
            Err(CombatError::CannotHealKO { .. })
        ));
        assert_eq!(target, before);
    }

    #[test]
    fn shield_caps_and_rejects_when_full() {
        let mut target = entity("t", 100);
        target.combat.shield = 15;

        let outcome = add_shield(&mut target, 20).unwrap();
        assert_eq!(outcome.shield_added, 5);
        assert_eq!(target.combat.shield, 20);

        assert_eq!(
            add_shield(&mut target, 20),
            Err(CombatError::NoOp(NoOpReason::ShieldFull))
        );
    }

    #[test]
    fn revive_restores_thirty_percent() {
        let config = CombatConfig::default();
        let mut target = entity("t", 0);
        target.combat.is_ko = true;

        let outcome = revive(&mut target, &config).unwrap();
        assert_eq!(outcome.current_hp, 30);
        assert!(!target.is_ko());

        assert!(matches!(
            revive(&mut target, &config),
            Err(CombatError::NotKO { .. })
        ));
    }
}
