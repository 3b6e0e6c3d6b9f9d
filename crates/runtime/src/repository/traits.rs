//! Repository contract for entity records.

use async_trait::async_trait;
use gotvalis_core::{CombatConfig, Entity, EntityId, SourceCredit};
use serde::{Deserialize, Serialize};

use super::Result;

/// Persistent storage of [`Entity`] records.
///
/// Implementations must make each call atomic for the record it touches.
/// Multi-record consistency is the caller's job (see `EntityLocks`).
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Load a record, `None` when the entity was never stored.
    async fn get(&self, id: &EntityId) -> Result<Option<Entity>>;

    /// Insert or replace a record. Returns the stored copy with its version bumped.
    async fn upsert(&self, entity: &Entity) -> Result<Entity>;

    /// Every record whose effect list is non-empty, expired entries included.
    async fn find_all_with_active_effects(&self) -> Result<Vec<Entity>>;

    /// Like [`find_all_with_active_effects`](Self::find_all_with_active_effects),
    /// also naming the records that could not be read.
    async fn scan_active_effects(&self) -> Result<EffectScan> {
        Ok(EffectScan {
            entities: self.find_all_with_active_effects().await?,
            unreadable: Vec::new(),
        })
    }

    /// Apply counter deltas to the stored record in one step.
    ///
    /// Fails with `MissingEntity` when there is no record to update.
    async fn increment_fields(&self, id: &EntityId, deltas: &[FieldDelta]) -> Result<Entity>;

    /// Remove a record. Returns whether one existed.
    async fn delete(&self, id: &EntityId) -> Result<bool>;

    /// Ids of every stored record, sorted.
    async fn list_ids(&self) -> Result<Vec<EntityId>>;

    /// Load a record, or the defaults for a first-time entity (not persisted).
    async fn load_or_default(&self, id: &EntityId, config: &CombatConfig) -> Result<Entity> {
        Ok(self
            .get(id)
            .await?
            .unwrap_or_else(|| Entity::new(id.clone(), config)))
    }
}

/// Records carrying effects, plus the ids a store skipped as unreadable.
#[derive(Clone, Debug, Default)]
pub struct EffectScan {
    pub entities: Vec<Entity>,
    pub unreadable: Vec<EntityId>,
}

/// Numeric fields that support in-place increments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    Coins,
    TotalEarned,
    DamageDealt,
    DamageTaken,
    HealingDone,
    Kills,
    Deaths,
}

/// A signed change to one counter. Results clamp at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDelta {
    pub field: CounterField,
    pub delta: i64,
}

impl FieldDelta {
    pub const fn new(field: CounterField, delta: i64) -> Self {
        Self { field, delta }
    }

    pub fn apply(&self, entity: &mut Entity) {
        let stats = &mut entity.stats;
        let economy = &mut entity.economy;
        match self.field {
            CounterField::Coins => economy.coins = shift_u64(economy.coins, self.delta),
            CounterField::TotalEarned => {
                economy.total_earned = shift_u64(economy.total_earned, self.delta)
            }
            CounterField::DamageDealt => {
                stats.damage_dealt = shift_u64(stats.damage_dealt, self.delta)
            }
            CounterField::DamageTaken => {
                stats.damage_taken = shift_u64(stats.damage_taken, self.delta)
            }
            CounterField::HealingDone => {
                stats.healing_done = shift_u64(stats.healing_done, self.delta)
            }
            CounterField::Kills => stats.kills = shift_u32(stats.kills, self.delta),
            CounterField::Deaths => stats.deaths = shift_u32(stats.deaths, self.delta),
        }
    }

    /// Deltas crediting a source with what it earned. Coins count toward
    /// both the balance and the lifetime total.
    pub fn from_credit(credit: &SourceCredit) -> Vec<Self> {
        [
            (CounterField::Coins, credit.coins),
            (CounterField::TotalEarned, credit.coins),
            (CounterField::DamageDealt, credit.damage_dealt),
            (CounterField::HealingDone, credit.healing_done),
            (CounterField::Kills, u64::from(credit.kills)),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0)
        .map(|(field, amount)| Self::new(field, i64::try_from(amount).unwrap_or(i64::MAX)))
        .collect()
    }
}

fn shift_u64(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta.unsigned_abs())
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

fn shift_u32(value: u32, delta: i64) -> u32 {
    let magnitude = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
    if delta >= 0 {
        value.saturating_add(magnitude)
    } else {
        value.saturating_sub(magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_becomes_non_zero_deltas() {
        let credit = SourceCredit {
            damage_dealt: 30,
            healing_done: 0,
            kills: 1,
            coins: 80,
        };

        let deltas = FieldDelta::from_credit(&credit);
        assert_eq!(
            deltas,
            vec![
                FieldDelta::new(CounterField::Coins, 80),
                FieldDelta::new(CounterField::TotalEarned, 80),
                FieldDelta::new(CounterField::DamageDealt, 30),
                FieldDelta::new(CounterField::Kills, 1),
            ]
        );
        assert!(FieldDelta::from_credit(&SourceCredit::default()).is_empty());
    }

    #[test]
    fn negative_deltas_clamp_at_zero() {
        let mut entity = Entity::new("a", &CombatConfig::default());
        entity.economy.coins = 10;

        FieldDelta::new(CounterField::Coins, -25).apply(&mut entity);
        FieldDelta::new(CounterField::Deaths, -1).apply(&mut entity);

        assert_eq!(entity.economy.coins, 0);
        assert_eq!(entity.stats.deaths, 0);
    }
}
