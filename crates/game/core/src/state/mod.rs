//! Persisted combatant state.
//!
//! This module owns the data structures that describe one entity: pools,
//! economy, counters, inventory and applied status effects. The runtime loads
//! and stores whole [`Entity`] records; the rules mutate them in place.
mod effects;
mod entity;
mod inventory;

pub use effects::{ActiveEffects, ApplyOutcome, DueTick, EffectContext, EffectInstance};
pub use entity::{CombatState, CombatStats, Economy, Entity, EntityId};
pub use inventory::Inventory;
