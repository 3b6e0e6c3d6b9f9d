//! Damage reduction from the target's active status effects.
//!
//! # Formula
//!
//! ```text
//! total_pct = Σ damage_reduction_pct over distinct active effects (capped at 100)
//! reduced   = max(1, floor(nominal × (100 - total_pct) / 100))
//! ```

use super::StatusEffectKind;

/// One effect's share of the reduction, kept for the damage breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReductionEntry {
    pub kind: StatusEffectKind,
    pub pct: u32,
    /// `floor(nominal × pct / 100)`, the per-effect amount shown to players.
    pub amount: u32,
}

/// Result of applying effect-based damage reduction to a nominal amount.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageReduction {
    pub nominal: u32,
    pub total_pct: u32,
    pub reduced: u32,
    pub entries: Vec<ReductionEntry>,
}

impl DamageReduction {
    pub fn is_reduced(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Reduces `nominal` by the stacked reductions of `active`.
///
/// Kinds without a reduction (REGENERATION) are ignored, duplicates count once.
pub fn reduce_damage(
    nominal: u32,
    active: impl IntoIterator<Item = StatusEffectKind>,
) -> DamageReduction {
    let mut entries: Vec<ReductionEntry> = Vec::new();

    for kind in active {
        let pct = kind.spec().damage_reduction_pct;
        if pct == 0 || entries.iter().any(|e| e.kind == kind) {
            continue;
        }
        entries.push(ReductionEntry {
            kind,
            pct,
            amount: percent_of(nominal, pct),
        });
    }

    let total_pct = entries.iter().map(|e| e.pct).sum::<u32>().min(100);
    let reduced = percent_of(nominal, 100 - total_pct).max(1);

    DamageReduction {
        nominal,
        total_pct,
        reduced,
        entries,
    }
}

/// `floor(value × pct / 100)` without intermediate overflow, saturating at `u32::MAX`.
pub(crate) fn percent_of(value: u32, pct: u32) -> u32 {
    u32::try_from(u64::from(value) * u64::from(pct) / 100).unwrap_or(u32::MAX)
}
