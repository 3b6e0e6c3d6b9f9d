//! Event types for different topics.

use gotvalis_core::{
    ApplyOutcome, EffectContext, EntityId, FightOutcome, HealActionOutcome, Polarity,
    ReviveOutcome, StatusEffectKind, TickOutcome,
};
use serde::{Deserialize, Serialize};

use crate::workers::SweepReport;

/// Accepted player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CombatEvent {
    Fight(Box<FightOutcome>),
    /// Heal, shield or cure item spent through `heal` or `use`.
    Support(Box<HealActionOutcome>),
    Revived {
        entity: EntityId,
        outcome: ReviveOutcome,
    },
}

/// Status-effect lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EffectEvent {
    Applied {
        entity: EntityId,
        outcome: ApplyOutcome,
    },
    Removed {
        entity: EntityId,
        kind: StatusEffectKind,
    },
    Expired {
        entity: EntityId,
        kinds: Vec<StatusEffectKind>,
    },
    Tick(TickReport),
    SweepCompleted(SweepReport),
}

/// One applied tick, with everything the channel notification shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub entity_id: EntityId,
    pub kind: StatusEffectKind,
    pub polarity: Polarity,
    pub tick_value: u32,
    pub hp_before: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub time_remaining_secs: u64,
    /// Channel the effect was applied from.
    pub route: EffectContext,
    /// The tick knocked the entity out.
    pub ko: bool,
}

impl TickReport {
    pub fn new(entity_id: EntityId, outcome: &TickOutcome, route: EffectContext) -> Self {
        Self {
            entity_id,
            kind: outcome.kind,
            polarity: outcome.polarity,
            tick_value: outcome.tick_value,
            hp_before: outcome.hp_before,
            current_hp: outcome.current_hp,
            max_hp: outcome.max_hp,
            time_remaining_secs: outcome.time_remaining_secs,
            route,
            ko: outcome.knocked_out,
        }
    }

    /// One-line notification text, e.g. `🔥 Brûlure: -1 PV (41/100), 45 min left`.
    pub fn summary(&self) -> String {
        let spec = self.kind.spec();
        let sign = match self.polarity {
            Polarity::Damage => '-',
            Polarity::Heal => '+',
        };
        let mut line = format!(
            "{} {}: {}{} PV ({}/{}), {} min left",
            spec.emoji,
            spec.display_name,
            sign,
            self.tick_value,
            self.current_hp,
            self.max_hp,
            self.time_remaining_secs / 60,
        );
        if self.ko {
            line.push_str(", KO");
        }
        line
    }
}
