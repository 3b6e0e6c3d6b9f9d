use core::fmt;

use crate::config::CombatConfig;
use crate::time::Timestamp;

use super::{ActiveEffects, Inventory};

/// Opaque, stable identifier of a combatant (a Discord user id in practice).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// FNV-1a hash of the id, used to derive per-entity RNG seeds.
    pub fn seed_hash(&self) -> u64 {
        const OFFSET: u64 = 0xcbf29ce484222325;
        const PRIME: u64 = 0x100000001b3;

        self.0
            .bytes()
            .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// HP and shield pools plus the KO flag.
///
/// `is_ko` is set in the same update that brings `hp` to 0 and is cleared
/// only by a revive.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    pub hp: u32,
    pub max_hp: u32,
    pub shield: u32,
    pub max_shield: u32,
    pub is_ko: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_ko_at: Option<Timestamp>,
}

impl CombatState {
    /// Full HP, empty shield.
    pub fn new(max_hp: u32, max_shield: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            shield: 0,
            max_shield,
            is_ko: false,
            last_ko_at: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_ko
    }

    pub fn missing_hp(&self) -> u32 {
        self.max_hp.saturating_sub(self.hp)
    }

    pub fn missing_shield(&self) -> u32 {
        self.max_shield.saturating_sub(self.shield)
    }
}

/// Currency balance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Economy {
    pub coins: u64,
    pub total_earned: u64,
}

impl Economy {
    /// Adds coins to both the balance and the lifetime total.
    pub fn earn(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
        self.total_earned = self.total_earned.saturating_add(amount);
    }

    /// Removes up to `amount` coins, clamping at 0. Returns what was removed.
    pub fn deduct(&mut self, amount: u64) -> u64 {
        let removed = amount.min(self.coins);
        self.coins -= removed;
        removed
    }
}

/// Cumulative combat counters. Never reset by the rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    /// Nominal damage dealt to other entities.
    pub damage_dealt: u64,
    /// Nominal (pre-absorption) damage received.
    pub damage_taken: u64,
    /// Actual HP restored, on self or others.
    pub healing_done: u64,
    pub kills: u32,
    pub deaths: u32,
}

impl CombatStats {
    /// Kills per death, deaths floored at 1.
    pub fn kda(&self) -> f64 {
        f64::from(self.kills) / f64::from(self.deaths.max(1))
    }
}

/// One combatant record, human or bot-controlled.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub combat: CombatState,
    #[cfg_attr(feature = "serde", serde(default))]
    pub economy: Economy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: CombatStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Inventory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: ActiveEffects,
    /// Last accepted attack, for the offense cooldown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_offense_at: Option<Timestamp>,
    /// Bumped by the store on every write.
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: u64,
}

impl Entity {
    /// Defaults used when an entity is first referenced.
    pub fn new(id: impl Into<EntityId>, config: &CombatConfig) -> Self {
        Self {
            id: id.into(),
            combat: CombatState::new(config.default_max_hp, config.default_max_shield),
            economy: Economy::default(),
            stats: CombatStats::default(),
            inventory: Inventory::empty(),
            effects: ActiveEffects::empty(),
            last_offense_at: None,
            version: 0,
        }
    }

    pub fn with_inventory<S: Into<String>>(
        mut self,
        items: impl IntoIterator<Item = (S, u32)>,
    ) -> Self {
        for (item, quantity) in items {
            self.inventory.add(item, quantity);
        }
        self
    }

    pub fn is_ko(&self) -> bool {
        self.combat.is_ko
    }
}
