//! Attack resolution.
//!
//! One attack runs these steps in order; later steps depend on the totals of
//! earlier ones:
//!
//! 1. validate (nothing mutated on failure)
//! 2. spend the item
//! 3. crit roll → nominal damage
//! 4. damage reduction from the target's active effects (min 1)
//! 5. cross-effect interactions: VIRUS transfer, then INFECTION bonus/spread
//! 6. resolve the damage on the target
//! 7. apply the item's status-effect payload

use crate::env::{CRIT_ROLL, INFECTION_ROLL, ItemDefinition, OffensiveData, compute_seed};
use crate::error::CombatError;
use crate::state::{ApplyOutcome, Entity, EntityId};
use crate::status::{DamageReduction, StatusEffectKind, reduce_damage};

use super::ActionEnv;
use super::crit::{CritRoll, roll_crit};
use super::damage::apply_damage;
use super::result::{DamageOutcome, SourceCredit};

/// VIRUS carried over from an infected attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirusTransfer {
    pub transfer: ApplyOutcome,
    /// Damage the attacker inflicts on itself.
    pub self_damage: DamageOutcome,
}

/// INFECTION interaction of an infected attacker on an uninfected target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfectionSpread {
    /// Flat damage added to the attack.
    pub bonus: u32,
    /// Set when the spread roll succeeded.
    pub spread: Option<ApplyOutcome>,
    /// Immediate damage dealt with the spread, attributed to the attacker.
    pub burst: Option<DamageOutcome>,
}

/// Everything an attack did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FightOutcome {
    pub actor_id: EntityId,
    pub target_id: EntityId,
    pub item_id: String,
    /// Units of the item the attacker has left.
    pub items_left: u32,

    pub shield_before: u32,
    pub hp_before: u32,
    pub shield_after: u32,
    pub hp_after: u32,

    pub crit: CritRoll,
    pub reduction: DamageReduction,
    /// Reduced damage plus any infection bonus.
    pub final_damage: u32,

    pub virus: Option<VirusTransfer>,
    pub infection: Option<InfectionSpread>,
    /// Main hit. `None` when the infection burst already knocked the target out.
    pub damage: Option<DamageOutcome>,
    pub applied_effect: Option<ApplyOutcome>,

    pub target_ko: bool,
    /// Credit for the attacker, to be applied to its record.
    pub credit: SourceCredit,
}

/// Checks every precondition of an attack without mutating anything.
pub fn validate_fight<'i>(
    actor: &Entity,
    target: &Entity,
    item: &'i ItemDefinition,
    env: &ActionEnv<'_>,
) -> Result<&'i OffensiveData, CombatError> {
    if actor.id == target.id {
        return Err(CombatError::SelfTarget);
    }

    let offensive = item.as_offensive().ok_or_else(|| CombatError::WrongItemKind {
        item: item.id.clone(),
        action: "fight",
    })?;

    if actor.is_ko() {
        return Err(CombatError::AlreadyKO {
            entity: actor.id.clone(),
        });
    }

    let cooldown = env.config.offense_cooldown_secs;
    if let Some(last) = actor.last_offense_at {
        let elapsed = env.now.elapsed_since(last);
        if cooldown > 0 && elapsed < cooldown {
            return Err(CombatError::OnCooldown {
                remaining_secs: cooldown - elapsed,
            });
        }
    }

    if !actor.inventory.has(&item.id) {
        return Err(CombatError::InsufficientResource {
            entity: actor.id.clone(),
            item: item.id.clone(),
        });
    }

    if target.is_ko() {
        return Err(CombatError::AlreadyKO {
            entity: target.id.clone(),
        });
    }

    Ok(offensive)
}

/// Resolves an attack of `actor` on `target` with `item`.
///
/// Once validation passes the item is spent, whatever the outcome. The
/// attacker's credit is returned in [`FightOutcome::credit`] and is not
/// applied to `actor`.
pub fn resolve_fight(
    actor: &mut Entity,
    target: &mut Entity,
    item: &ItemDefinition,
    env: &ActionEnv<'_>,
) -> Result<FightOutcome, CombatError> {
    let offensive = *validate_fight(actor, target, item, env)?;
    let now = env.now;
    let config = env.config;

    let items_left = actor
        .inventory
        .take_one(&item.id)
        .ok_or_else(|| CombatError::InsufficientResource {
            entity: actor.id.clone(),
            item: item.id.clone(),
        })?;
    actor.last_offense_at = Some(now);

    let shield_before = target.combat.shield;
    let hp_before = target.combat.hp;
    let actor_hash = actor.id.seed_hash();

    let crit = roll_crit(
        &offensive,
        env.rng,
        compute_seed(env.action_seed, actor_hash, CRIT_ROLL),
    );
    let reduction = reduce_damage(crit.amount, target.effects.active_kinds(now));
    let mut final_damage = reduction.reduced;
    let mut credit = SourceCredit::default();

    let virus = if actor.effects.has_active(StatusEffectKind::Virus, now) {
        let transfer = target
            .effects
            .apply(StatusEffectKind::Virus, now, env.context.clone());
        let self_damage = apply_damage(actor, config.virus_transfer_damage, None, now, config)?;
        Some(VirusTransfer {
            transfer,
            self_damage,
        })
    } else {
        None
    };

    let infection = if actor.effects.has_active(StatusEffectKind::Infection, now)
        && !target.effects.has_active(StatusEffectKind::Infection, now)
    {
        final_damage += config.infection_attack_bonus;

        let spread_seed = compute_seed(env.action_seed, actor_hash, INFECTION_ROLL);
        let (spread, burst) = if env.rng.chance(spread_seed, config.infection_spread_chance_pct) {
            let spread = target
                .effects
                .apply(StatusEffectKind::Infection, now, env.context.clone());
            let burst = apply_damage(
                target,
                config.infection_burst_damage,
                Some(&actor.id),
                now,
                config,
            )?;
            credit.merge(burst.credit);
            (Some(spread), Some(burst))
        } else {
            (None, None)
        };

        Some(InfectionSpread {
            bonus: config.infection_attack_bonus,
            spread,
            burst,
        })
    } else {
        None
    };

    let damage = if target.is_ko() {
        None
    } else {
        let outcome = apply_damage(target, final_damage, Some(&actor.id), now, config)?;
        credit.merge(outcome.credit);
        Some(outcome)
    };

    let applied_effect = offensive
        .applies
        .map(|kind| target.effects.apply(kind, now, env.context.clone()));

    Ok(FightOutcome {
        actor_id: actor.id.clone(),
        target_id: target.id.clone(),
        item_id: item.id.clone(),
        items_left,
        shield_before,
        hp_before,
        shield_after: target.combat.shield,
        hp_after: target.combat.hp,
        crit,
        reduction,
        final_damage,
        virus,
        infection,
        damage,
        applied_effect,
        target_ko: target.is_ko(),
        credit,
    })
}
