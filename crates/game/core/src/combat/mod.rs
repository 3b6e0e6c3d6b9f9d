//! Combat resolution system.
//!
//! This module provides pure functions for resolving combat interactions.
//! Nothing here performs I/O or reads the clock: instants, seeds and oracles
//! come in through arguments, and results come back as values.
//!
//! # Architecture
//!
//! - **Resolver**: [`apply_damage`], [`apply_healing`], [`add_shield`],
//!   [`revive`] mutate only the target and return a [`SourceCredit`] ledger
//!   for the source
//! - **Ticks**: [`resolve_tick`] applies one due status-effect tick
//! - **Actions**: [`resolve_fight`] and [`resolve_support`] sequence whole
//!   player actions on loaded records; the runtime wraps them in locks and
//!   persistence

mod crit;
mod damage;
mod fight;
mod heal;
mod result;
mod support;
mod tick;

pub use crit::{CritRoll, roll_crit};
pub use damage::apply_damage;
pub use fight::{FightOutcome, InfectionSpread, VirusTransfer, resolve_fight, validate_fight};
pub use heal::{add_shield, apply_healing, revive};
pub use result::{DamageOutcome, HealOutcome, ReviveOutcome, ShieldOutcome, SourceCredit};
pub use support::{
    HealActionOutcome, SupportAction, SupportEffect, resolve_support, validate_support,
};
pub use tick::{TickOutcome, resolve_tick};

use crate::config::CombatConfig;
use crate::env::RngOracle;
use crate::state::EffectContext;
use crate::time::Timestamp;

/// Read-only inputs shared by every step of one player action.
#[derive(Clone)]
pub struct ActionEnv<'a> {
    pub now: Timestamp,
    /// Fresh per action; individual rolls derive from it.
    pub action_seed: u64,
    /// Notification route stored on effects applied by the action.
    pub context: EffectContext,
    pub config: &'a CombatConfig,
    pub rng: &'a dyn RngOracle,
}
