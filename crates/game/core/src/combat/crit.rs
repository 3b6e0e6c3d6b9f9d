//! Critical hit roll.

use crate::env::{OffensiveData, RngOracle};
use crate::status::percent_of;

/// Nominal damage after the crit roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CritRoll {
    pub base: u32,
    pub is_crit: bool,
    /// `floor(base × crit_multiplier_pct / 100)` on a crit, `base` otherwise.
    pub amount: u32,
}

/// Rolls for a critical hit with the item's chance and multiplier.
pub fn roll_crit(item: &OffensiveData, rng: &(impl RngOracle + ?Sized), seed: u64) -> CritRoll {
    let base = item.base_damage;
    let is_crit = rng.chance(seed, item.crit_chance_pct);
    let amount = if is_crit {
        percent_of(base, item.crit_multiplier_pct)
    } else {
        base
    };

    CritRoll {
        base,
        is_crit,
        amount,
    }
}
