//! Deterministic combat and status-effect rules for GotValis.
//!
//! `gotvalis-core` defines the canonical rules (damage/heal resolution,
//! status-effect catalog and lifecycle, player actions) and exposes pure,
//! synchronous APIs. The runtime crate supplies persistence, locking, the
//! clock and the periodic sweep; everything it computes goes through the
//! functions re-exported here.
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod state;
pub mod status;
pub mod time;

pub use combat::{
    ActionEnv, CritRoll, DamageOutcome, FightOutcome, HealActionOutcome, HealOutcome,
    InfectionSpread, ReviveOutcome, ShieldOutcome, SourceCredit, SupportAction, SupportEffect,
    TickOutcome, VirusTransfer, add_shield, apply_damage, apply_healing, resolve_fight,
    resolve_support, resolve_tick, revive, roll_crit, validate_fight, validate_support,
};
pub use config::CombatConfig;
pub use env::{
    CureData, HealingData, ItemDefinition, ItemKind, ItemOracle, OffensiveData, PcgRng,
    RngOracle, ShieldData, compute_seed,
};
pub use error::{CombatError, ErrorSeverity, GameError, Missing, NoOpReason};
pub use state::{
    ActiveEffects, ApplyOutcome, CombatState, CombatStats, DueTick, Economy, EffectContext,
    EffectInstance, Entity, EntityId, Inventory,
};
pub use status::{
    DamageReduction, EffectFlags, EffectSpec, Polarity, ReductionEntry, StatusEffectKind,
    reduce_damage,
};
pub use time::Timestamp;
