//! Heal, shield and cure items.
//!
//! Same shape as an attack without the cross-effect step: validate, spend the
//! item, resolve on the target, then apply the item's payload. A request that
//! would change nothing is rejected during validation, so the item is kept.

use crate::env::{ItemDefinition, ItemKind};
use crate::error::{CombatError, NoOpReason};
use crate::state::{ApplyOutcome, Entity, EntityId};
use crate::status::StatusEffectKind;
use crate::time::Timestamp;

use super::ActionEnv;
use super::heal::{add_shield, apply_healing};
use super::result::{HealOutcome, ShieldOutcome, SourceCredit};

/// Which command spends the item; decides the accepted item kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupportAction {
    /// Healing and shield items.
    Heal,
    /// Healing, shield and cure items.
    Use,
}

impl SupportAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Heal => "heal",
            Self::Use => "use",
        }
    }

    fn accepts(self, kind: &ItemKind) -> bool {
        match (self, kind) {
            (_, ItemKind::Healing(_) | ItemKind::Shield(_)) => true,
            (Self::Use, ItemKind::Cure(_)) => true,
            _ => false,
        }
    }
}

/// What the item did to the target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupportEffect {
    Heal(HealOutcome),
    Shield(ShieldOutcome),
    Cure { removed: Vec<StatusEffectKind> },
}

/// Everything a heal/shield/cure action did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealActionOutcome {
    pub user_id: EntityId,
    pub target_id: EntityId,
    pub item_id: String,
    pub items_left: u32,
    pub effect: SupportEffect,
    pub applied_effect: Option<ApplyOutcome>,
    /// Credit for the user when healing someone else.
    pub credit: SourceCredit,
}

/// Checks every precondition of a support action without mutating anything.
///
/// `target` is the user itself for self-targeted actions. Effects expired at
/// `now` but not yet swept do not count as curable.
pub fn validate_support(
    user: &Entity,
    target: &Entity,
    item: &ItemDefinition,
    action: SupportAction,
    now: Timestamp,
) -> Result<(), CombatError> {
    if !action.accepts(&item.kind) {
        return Err(CombatError::WrongItemKind {
            item: item.id.clone(),
            action: action.label(),
        });
    }

    if !user.inventory.has(&item.id) {
        return Err(CombatError::InsufficientResource {
            entity: user.id.clone(),
            item: item.id.clone(),
        });
    }

    if target.is_ko() {
        return Err(CombatError::CannotHealKO {
            entity: target.id.clone(),
        });
    }

    match &item.kind {
        ItemKind::Healing(data) if data.heal_amount > 0 && target.combat.missing_hp() == 0 => {
            Err(CombatError::NoOp(NoOpReason::HpFull))
        }
        ItemKind::Shield(_) if target.combat.missing_shield() == 0 => {
            Err(CombatError::NoOp(NoOpReason::ShieldFull))
        }
        ItemKind::Cure(data)
            if !data
                .cures
                .iter()
                .any(|kind| target.effects.has_active(*kind, now)) =>
        {
            Err(CombatError::NoOp(NoOpReason::NothingToCure))
        }
        _ => Ok(()),
    }
}

/// Resolves a support action of `user` on `target` (`None` = on itself).
pub fn resolve_support(
    user: &mut Entity,
    target: Option<&mut Entity>,
    item: &ItemDefinition,
    action: SupportAction,
    env: &ActionEnv<'_>,
) -> Result<HealActionOutcome, CombatError> {
    let target_view: &Entity = target.as_deref().unwrap_or(&*user);
    validate_support(&*user, target_view, item, action, env.now)?;

    let items_left = user
        .inventory
        .take_one(&item.id)
        .ok_or_else(|| CombatError::InsufficientResource {
            entity: user.id.clone(),
            item: item.id.clone(),
        })?;

    let user_id = user.id.clone();
    let recipient: &mut Entity = match target {
        Some(target) => target,
        None => user,
    };

    let mut credit = SourceCredit::default();
    let effect = match &item.kind {
        ItemKind::Healing(data) => {
            let outcome = apply_healing(recipient, data.heal_amount, Some(&user_id), env.config)?;
            credit.merge(outcome.credit);
            SupportEffect::Heal(outcome)
        }
        ItemKind::Shield(data) => SupportEffect::Shield(add_shield(recipient, data.shield_amount)?),
        ItemKind::Cure(data) => {
            // Stale instances stay for cleanup_expired.
            let removed = data
                .cures
                .iter()
                .copied()
                .filter_map(|kind| {
                    if recipient.effects.has_active(kind, env.now) {
                        recipient.effects.remove(kind).ok()
                    } else {
                        None
                    }
                })
                .map(|instance| instance.kind)
                .collect();
            SupportEffect::Cure { removed }
        }
        ItemKind::Offensive(_) => {
            return Err(CombatError::WrongItemKind {
                item: item.id.clone(),
                action: action.label(),
            });
        }
    };

    let applied_effect = item
        .payload()
        .map(|kind| recipient.effects.apply(kind, env.now, env.context.clone()));

    Ok(HealActionOutcome {
        user_id,
        target_id: recipient.id.clone(),
        item_id: item.id.clone(),
        items_left,
        effect,
        applied_effect,
        credit,
    })
}
