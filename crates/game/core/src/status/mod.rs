//! Status effects: the static catalog and the damage-reduction table.
//!
//! Effects are time-bound modifiers that tick damage or healing onto an
//! entity at a fixed interval. The catalog is data only; the lifecycle of an
//! applied instance lives in [`crate::state::ActiveEffects`].

mod catalog;
mod reduction;

pub use catalog::{EffectFlags, EffectSpec, Polarity, StatusEffectKind};
pub use reduction::{DamageReduction, ReductionEntry, reduce_damage};
pub(crate) use reduction::percent_of;
