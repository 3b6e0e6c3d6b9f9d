//! Status effect catalog.

use bitflags::bitflags;
use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::CombatError;

/// Kinds of status effects an entity can carry.
///
/// At most one instance of each kind is active per entity.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum StatusEffectKind {
    Poison,
    Virus,
    Infection,
    Burn,
    Regeneration,
}

/// Whether a tick removes or restores HP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Polarity {
    Damage,
    Heal,
}

bitflags! {
    /// Special behaviours layered on top of plain ticking.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EffectFlags: u8 {
        /// Carried over to the target when the bearer attacks.
        const TRANSFERABLE = 0b0000_0001;
        /// Bearer's attacks get a bonus on uninfected targets and may spread it.
        const INFECTIOUS = 0b0000_0010;
    }
}

/// Static definition of an effect kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectSpec {
    pub kind: StatusEffectKind,
    pub display_name: &'static str,
    pub emoji: &'static str,
    pub polarity: Polarity,
    pub tick_value: u32,
    pub tick_interval_secs: u64,
    pub duration_secs: u64,
    pub flags: EffectFlags,
    /// Incoming offensive damage reduction (percent) while this effect is active.
    pub damage_reduction_pct: u32,
}

const POISON: EffectSpec = EffectSpec {
    kind: StatusEffectKind::Poison,
    display_name: "Poison",
    emoji: "🧪",
    polarity: Polarity::Damage,
    tick_value: 1,
    tick_interval_secs: 1800,
    duration_secs: 10800,
    flags: EffectFlags::empty(),
    damage_reduction_pct: 10,
};

const VIRUS: EffectSpec = EffectSpec {
    kind: StatusEffectKind::Virus,
    display_name: "Virus",
    emoji: "🦠",
    polarity: Polarity::Damage,
    tick_value: 5,
    tick_interval_secs: 3600,
    duration_secs: 21600,
    flags: EffectFlags::TRANSFERABLE,
    damage_reduction_pct: 15,
};

const INFECTION: EffectSpec = EffectSpec {
    kind: StatusEffectKind::Infection,
    display_name: "Infection",
    emoji: "🧟",
    polarity: Polarity::Damage,
    tick_value: 5,
    tick_interval_secs: 1800,
    duration_secs: 10800,
    flags: EffectFlags::INFECTIOUS,
    damage_reduction_pct: 12,
};

const BURN: EffectSpec = EffectSpec {
    kind: StatusEffectKind::Burn,
    display_name: "Brûlure",
    emoji: "🔥",
    polarity: Polarity::Damage,
    tick_value: 1,
    tick_interval_secs: 900,
    duration_secs: 3600,
    flags: EffectFlags::empty(),
    damage_reduction_pct: 8,
};

const REGENERATION: EffectSpec = EffectSpec {
    kind: StatusEffectKind::Regeneration,
    display_name: "Régénération",
    emoji: "💕",
    polarity: Polarity::Heal,
    tick_value: 2,
    tick_interval_secs: 1800,
    duration_secs: 18000,
    flags: EffectFlags::empty(),
    damage_reduction_pct: 0,
};

impl StatusEffectKind {
    /// Catalog entry for this kind.
    pub const fn spec(self) -> &'static EffectSpec {
        match self {
            Self::Poison => &POISON,
            Self::Virus => &VIRUS,
            Self::Infection => &INFECTION,
            Self::Burn => &BURN,
            Self::Regeneration => &REGENERATION,
        }
    }

    /// Parses a catalog name (`"POISON"`, case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, CombatError> {
        name.parse().map_err(|_| CombatError::InvalidEffect {
            name: name.to_owned(),
        })
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub const fn polarity(self) -> Polarity {
        self.spec().polarity
    }

    pub const fn is_transferable(self) -> bool {
        self.spec().flags.contains(EffectFlags::TRANSFERABLE)
    }

    pub const fn is_infectious(self) -> bool {
        self.spec().flags.contains(EffectFlags::INFECTIOUS)
    }

    /// Every catalog entry, in declaration order.
    pub fn catalog() -> impl Iterator<Item = &'static EffectSpec> {
        Self::iter().map(Self::spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_values_match_live_balance() {
        let rows: Vec<_> = StatusEffectKind::catalog()
            .map(|s| (s.kind, s.polarity, s.tick_value, s.tick_interval_secs, s.duration_secs))
            .collect();

        assert_eq!(
            rows,
            vec![
                (StatusEffectKind::Poison, Polarity::Damage, 1, 1800, 10800),
                (StatusEffectKind::Virus, Polarity::Damage, 5, 3600, 21600),
                (StatusEffectKind::Infection, Polarity::Damage, 5, 1800, 10800),
                (StatusEffectKind::Burn, Polarity::Damage, 1, 900, 3600),
                (StatusEffectKind::Regeneration, Polarity::Heal, 2, 1800, 18000),
            ]
        );
    }

    #[test]
    fn only_virus_transfers_and_only_infection_spreads() {
        for kind in StatusEffectKind::iter() {
            assert_eq!(kind.is_transferable(), kind == StatusEffectKind::Virus);
            assert_eq!(kind.is_infectious(), kind == StatusEffectKind::Infection);
        }
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(
            StatusEffectKind::from_name("regeneration"),
            Ok(StatusEffectKind::Regeneration)
        );
        assert_eq!(StatusEffectKind::Burn.name(), "BURN");
        assert_eq!(
            StatusEffectKind::from_name("FROSTBITE"),
            Err(CombatError::InvalidEffect {
                name: "FROSTBITE".into()
            })
        );
    }

    #[test]
    fn kind_count_bounds_the_effect_list() {
        assert_eq!(StatusEffectKind::COUNT, 5);
    }
}
