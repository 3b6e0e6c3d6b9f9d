//! Resolver result types.
//!
//! Every field a presentation layer needs is computed here, so nothing
//! downstream has to re-derive numbers.

use crate::state::Entity;

/// What the source of a damage or heal earns from it.
///
/// The resolver only mutates the target. The caller applies this ledger to
/// the source record, usually as a batch of counter increments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceCredit {
    pub damage_dealt: u64,
    pub healing_done: u64,
    pub kills: u32,
    pub coins: u64,
}

impl SourceCredit {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn merge(&mut self, other: SourceCredit) {
        self.damage_dealt = self.damage_dealt.saturating_add(other.damage_dealt);
        self.healing_done = self.healing_done.saturating_add(other.healing_done);
        self.kills = self.kills.saturating_add(other.kills);
        self.coins = self.coins.saturating_add(other.coins);
    }

    /// Applies the ledger to an in-memory source record.
    pub fn apply_to(&self, source: &mut Entity) {
        source.stats.damage_dealt = source.stats.damage_dealt.saturating_add(self.damage_dealt);
        source.stats.healing_done = source.stats.healing_done.saturating_add(self.healing_done);
        source.stats.kills = source.stats.kills.saturating_add(self.kills);
        source.economy.earn(self.coins);
    }
}

/// Result of [`super::apply_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOutcome {
    pub shield_before: u32,
    pub hp_before: u32,
    /// Absorbed by the shield.
    pub shield_damage: u32,
    /// Remainder aimed at HP, before clamping at 0.
    pub hp_damage: u32,
    /// Nominal amount.
    pub total_damage: u32,
    pub current_hp: u32,
    pub current_shield: u32,
    pub is_ko: bool,
    /// True when this damage caused the KO.
    pub knocked_out: bool,
    /// Coins actually removed from the target by the KO penalty.
    pub death_penalty: u64,
    pub credit: SourceCredit,
}

/// Result of [`super::apply_healing`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealOutcome {
    pub hp_before: u32,
    /// Actual HP restored, capped by missing HP.
    pub heal_amount: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub credit: SourceCredit,
}

/// Result of [`super::add_shield`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldOutcome {
    pub shield_before: u32,
    pub shield_added: u32,
    pub current_shield: u32,
    pub max_shield: u32,
}

/// Result of [`super::revive`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReviveOutcome {
    pub current_hp: u32,
    pub max_hp: u32,
}
