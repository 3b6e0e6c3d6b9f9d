//! Lifecycle of status effects applied to one entity.
//!
//! # Time-based Duration
//!
//! An instance is active while `now - applied_at < duration_secs`. Expired
//! instances stay in the list until [`ActiveEffects::cleanup_expired`] runs,
//! but every read projection ignores them.
//!
//! # Tick grid
//!
//! Ticks fall on `applied_at + k × tick_interval_secs`. A due tick moves
//! `last_tick_at` to the latest grid point not after `now`, so a sweep that
//! arrives late neither drifts the grid nor fires the missed ticks.

use arrayvec::ArrayVec;
use strum::EnumCount;

use crate::error::{CombatError, Missing};
use crate::status::{Polarity, StatusEffectKind};
use crate::time::Timestamp;

/// Where tick notifications for an effect should be routed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectContext {
    pub channel_id: Option<String>,
    pub guild_id: Option<String>,
}

impl EffectContext {
    pub fn channel(channel_id: impl Into<String>, guild_id: impl Into<String>) -> Self {
        Self {
            channel_id: Some(channel_id.into()),
            guild_id: Some(guild_id.into()),
        }
    }
}

/// A status effect applied to an entity.
///
/// Tick value and interval are copied from the catalog at application time,
/// so catalog changes never alter an effect already in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectInstance {
    pub kind: StatusEffectKind,
    pub applied_at: Timestamp,
    pub duration_secs: u64,
    pub tick_value: u32,
    pub tick_interval_secs: u64,
    pub last_tick_at: Timestamp,
    #[cfg_attr(feature = "serde", serde(default))]
    pub context: EffectContext,
}

impl EffectInstance {
    /// Fresh instance with catalog defaults.
    pub fn from_catalog(kind: StatusEffectKind, now: Timestamp, context: EffectContext) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            applied_at: now,
            duration_secs: spec.duration_secs,
            tick_value: spec.tick_value,
            tick_interval_secs: spec.tick_interval_secs,
            last_tick_at: now,
            context,
        }
    }

    pub fn is_active_at(&self, now: Timestamp) -> bool {
        now.elapsed_since(self.applied_at) < self.duration_secs
    }

    pub fn expires_at(&self) -> Timestamp {
        self.applied_at.plus(self.duration_secs)
    }

    /// Seconds until expiry, 0 once expired.
    pub fn time_remaining(&self, now: Timestamp) -> u64 {
        self.duration_secs
            .saturating_sub(now.elapsed_since(self.applied_at))
    }

    /// Grid point the next tick would move `last_tick_at` to, if a tick is due.
    pub fn tick_due_at(&self, now: Timestamp) -> Option<Timestamp> {
        if self.tick_interval_secs == 0 || !self.is_active_at(now) {
            return None;
        }

        let elapsed = now.elapsed_since(self.last_tick_at);
        if elapsed < self.tick_interval_secs {
            return None;
        }

        let periods = elapsed / self.tick_interval_secs;
        Some(self.last_tick_at.plus(periods * self.tick_interval_secs))
    }

    fn refresh(&mut self, now: Timestamp, context: EffectContext) {
        *self = Self::from_catalog(self.kind, now, context);
    }
}

/// Result of [`ActiveEffects::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyOutcome {
    pub kind: StatusEffectKind,
    /// True when an active instance of the same kind was reset in place.
    pub refreshed: bool,
    pub duration_secs: u64,
}

/// A tick that is due on one effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DueTick {
    pub kind: StatusEffectKind,
    pub polarity: Polarity,
    pub tick_value: u32,
    /// New `last_tick_at` once the tick is processed.
    pub tick_at: Timestamp,
}

/// Status effects carried by an entity, at most one per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActiveEffects {
    effects: ArrayVec<EffectInstance, { StatusEffectKind::COUNT }>,
}

impl ActiveEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Applies `kind`, refreshing an active instance instead of stacking.
    ///
    /// An expired instance still waiting for cleanup is replaced and reported
    /// as a fresh application.
    pub fn apply(
        &mut self,
        kind: StatusEffectKind,
        now: Timestamp,
        context: EffectContext,
    ) -> ApplyOutcome {
        let refreshed = match self.effects.iter_mut().find(|e| e.kind == kind) {
            Some(existing) => {
                let was_active = existing.is_active_at(now);
                existing.refresh(now, context);
                was_active
            }
            None => {
                // One slot per kind, so a missing kind always fits.
                if !self.effects.is_full() {
                    self.effects
                        .push(EffectInstance::from_catalog(kind, now, context));
                }
                false
            }
        };

        ApplyOutcome {
            kind,
            refreshed,
            duration_secs: kind.spec().duration_secs,
        }
    }

    /// Removes the instance of `kind`, whether expired or not.
    pub fn remove(&mut self, kind: StatusEffectKind) -> Result<EffectInstance, CombatError> {
        let index = self
            .effects
            .iter()
            .position(|e| e.kind == kind)
            .ok_or(CombatError::NotFound(Missing::Effect(kind)))?;
        Ok(self.effects.remove(index))
    }

    /// Instances still active at `now`, in application order.
    pub fn active_at(&self, now: Timestamp) -> impl Iterator<Item = &EffectInstance> + '_ {
        self.effects.iter().filter(move |e| e.is_active_at(now))
    }

    pub fn active_kinds(&self, now: Timestamp) -> impl Iterator<Item = StatusEffectKind> + '_ {
        self.active_at(now).map(|e| e.kind)
    }

    pub fn has_active(&self, kind: StatusEffectKind, now: Timestamp) -> bool {
        self.active_at(now).any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&EffectInstance> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Drops every instance expired at `now`. Returns how many were removed.
    pub fn cleanup_expired(&mut self, now: Timestamp) -> usize {
        let before = self.effects.len();
        self.effects.retain(|e| e.is_active_at(now));
        before - self.effects.len()
    }

    /// Ticks due at `now`, one per effect at most.
    pub fn due_ticks(&self, now: Timestamp) -> Vec<DueTick> {
        self.effects
            .iter()
            .filter_map(|e| {
                e.tick_due_at(now).map(|tick_at| DueTick {
                    kind: e.kind,
                    polarity: e.kind.polarity(),
                    tick_value: e.tick_value,
                    tick_at,
                })
            })
            .collect()
    }

    /// Records a processed tick by moving `last_tick_at` forward.
    pub fn mark_ticked(&mut self, kind: StatusEffectKind, tick_at: Timestamp) {
        if let Some(effect) = self.effects.iter_mut().find(|e| e.kind == kind) {
            effect.last_tick_at = effect.last_tick_at.max(tick_at);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
