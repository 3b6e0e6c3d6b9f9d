//! Traits describing read-only collaborators of the rules.
//!
//! Oracles expose item definitions and randomness. The rules take them as
//! trait objects so the runtime can plug in a data-driven catalog and tests
//! can script every roll.
mod items;
mod rng;

pub use items::{
    CureData, HealingData, ItemDefinition, ItemKind, ItemOracle, OffensiveData, ShieldData,
};
pub use rng::{CRIT_ROLL, INFECTION_ROLL, PcgRng, RngOracle, compute_seed};
