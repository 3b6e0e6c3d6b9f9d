//! Combat orchestrator: player actions as single transactions.

use std::sync::Arc;

use gotvalis_core::{
    ActionEnv, CombatError, CombatStats, EffectContext, Entity, EntityId, FightOutcome, GameError,
    HealActionOutcome, ItemDefinition, ItemOracle, Polarity, ReviveOutcome, RngOracle,
    StatusEffectKind, SupportAction, Timestamp, resolve_fight, resolve_support, revive,
};
use serde::Serialize;
use tracing::{info, warn};

use super::ServiceContext;
use crate::api::{Result, RuntimeError};
use crate::events::{CombatEvent, Event};

/// Runs fights, heals, item use and revives.
///
/// Entities referenced for the first time get default records; nothing is
/// written for them unless the action is accepted.
#[derive(Clone)]
pub struct CombatService {
    ctx: ServiceContext,
    items: Arc<dyn ItemOracle>,
    rng: Arc<dyn RngOracle>,
}

/// Read-only projection of an entity for profile and status displays.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CombatStatus {
    pub id: EntityId,
    pub hp: u32,
    pub max_hp: u32,
    pub shield: u32,
    pub max_shield: u32,
    pub is_ko: bool,
    pub coins: u64,
    pub effects: Vec<ActiveEffectView>,
    pub stats: CombatStats,
    pub kda: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActiveEffectView {
    pub kind: StatusEffectKind,
    pub emoji: &'static str,
    pub display_name: &'static str,
    pub polarity: Polarity,
    pub tick_value: u32,
    pub time_remaining_secs: u64,
    /// 0 when a tick is already due.
    pub next_tick_in_secs: u64,
}

impl CombatStatus {
    fn project(entity: &Entity, now: Timestamp) -> Self {
        let effects = entity
            .effects
            .active_at(now)
            .map(|effect| {
                let spec = effect.kind.spec();
                ActiveEffectView {
                    kind: effect.kind,
                    emoji: spec.emoji,
                    display_name: spec.display_name,
                    polarity: spec.polarity,
                    tick_value: effect.tick_value,
                    time_remaining_secs: effect.time_remaining(now),
                    next_tick_in_secs: effect
                        .last_tick_at
                        .plus(effect.tick_interval_secs)
                        .elapsed_since(now),
                }
            })
            .collect();

        Self {
            id: entity.id.clone(),
            hp: entity.combat.hp,
            max_hp: entity.combat.max_hp,
            shield: entity.combat.shield,
            max_shield: entity.combat.max_shield,
            is_ko: entity.combat.is_ko,
            coins: entity.economy.coins,
            effects,
            stats: entity.stats.clone(),
            kda: entity.stats.kda(),
        }
    }
}

impl CombatService {
    pub(crate) fn new(
        ctx: ServiceContext,
        items: Arc<dyn ItemOracle>,
        rng: Arc<dyn RngOracle>,
    ) -> Self {
        Self { ctx, items, rng }
    }

    /// Resolve an item by id or emoji.
    pub fn item(&self, key: &str) -> Result<ItemDefinition> {
        self.items
            .definition(key)
            .ok_or_else(|| CombatError::item_not_found(key).into())
    }

    pub fn items(&self) -> Vec<ItemDefinition> {
        self.items.all_definitions()
    }

    /// `actor` attacks `target` with an offensive item.
    pub async fn fight(
        &self,
        actor_id: &EntityId,
        target_id: &EntityId,
        item_key: &str,
        context: EffectContext,
    ) -> Result<FightOutcome> {
        if actor_id == target_id {
            return Err(self.rejected(actor_id, "fight", CombatError::SelfTarget));
        }
        let item = self
            .item(item_key)
            .map_err(|err| self.log_rejection(actor_id, "fight", err))?;

        let _guards = self.ctx.locks.lock_many(&[actor_id, target_id]).await;
        let mut actor = self.load(actor_id).await?;
        let mut target = self.load(target_id).await?;

        let env = self.env(context);
        let outcome = resolve_fight(&mut actor, &mut target, &item, &env)
            .map_err(|err| self.rejected(actor_id, "fight", err))?;

        // One write per record. The actor goes first so a failed write never
        // stores damage without the spent item and the attacker's credit.
        outcome.credit.apply_to(&mut actor);
        self.ctx.store.upsert(&actor).await?;
        self.ctx.store.upsert(&target).await?;

        info!(
            actor = %actor_id,
            target = %target_id,
            item = %item.id,
            crit = outcome.crit.is_crit,
            damage = outcome.final_damage,
            hp = outcome.hp_after,
            ko = outcome.target_ko,
            "fight resolved"
        );
        self.ctx
            .events
            .publish(Event::Combat(CombatEvent::Fight(Box::new(outcome.clone()))));
        Ok(outcome)
    }

    /// Heal or shield `target` (the healer itself when `None`).
    pub async fn heal(
        &self,
        healer_id: &EntityId,
        target_id: Option<&EntityId>,
        item_key: &str,
        context: EffectContext,
    ) -> Result<HealActionOutcome> {
        self.support(SupportAction::Heal, healer_id, target_id, item_key, context)
            .await
    }

    /// Use a heal, shield or cure item on `target` (the user itself when `None`).
    pub async fn use_item(
        &self,
        user_id: &EntityId,
        target_id: Option<&EntityId>,
        item_key: &str,
        context: EffectContext,
    ) -> Result<HealActionOutcome> {
        self.support(SupportAction::Use, user_id, target_id, item_key, context)
            .await
    }

    /// Bring a KO entity back with part of its max HP.
    pub async fn revive(&self, id: &EntityId) -> Result<ReviveOutcome> {
        let _guard = self.ctx.locks.lock(id).await;
        let mut entity = self.ctx.load_existing(id).await?;

        let outcome =
            revive(&mut entity, &self.ctx.config).map_err(|err| self.rejected(id, "revive", err))?;
        self.ctx.store.upsert(&entity).await?;

        info!(entity = %id, hp = outcome.current_hp, "entity revived");
        self.ctx.events.publish(Event::Combat(CombatEvent::Revived {
            entity: id.clone(),
            outcome,
        }));
        Ok(outcome)
    }

    /// Current HP, shield, effects and counters. Unknown ids show defaults.
    pub async fn status(&self, id: &EntityId, now: Timestamp) -> Result<CombatStatus> {
        let entity = self.load(id).await?;
        Ok(CombatStatus::project(&entity, now))
    }

    async fn support(
        &self,
        action: SupportAction,
        user_id: &EntityId,
        target_id: Option<&EntityId>,
        item_key: &str,
        context: EffectContext,
    ) -> Result<HealActionOutcome> {
        let target_id = target_id.filter(|id| *id != user_id);
        let item = self
            .item(item_key)
            .map_err(|err| self.log_rejection(user_id, action.label(), err))?;

        let ids: Vec<&EntityId> = std::iter::once(user_id).chain(target_id).collect();
        let _guards = self.ctx.locks.lock_many(&ids).await;
        let mut user = self.load(user_id).await?;
        let mut target = match target_id {
            Some(id) => Some(self.load(id).await?),
            None => None,
        };

        let env = self.env(context);
        let outcome = resolve_support(&mut user, target.as_mut(), &item, action, &env)
            .map_err(|err| self.rejected(user_id, action.label(), err))?;

        outcome.credit.apply_to(&mut user);
        self.ctx.store.upsert(&user).await?;
        if let Some(target) = &target {
            self.ctx.store.upsert(target).await?;
        }

        info!(
            user = %user_id,
            target = %outcome.target_id,
            item = %item.id,
            action = action.label(),
            "support item used"
        );
        self.ctx
            .events
            .publish(Event::Combat(CombatEvent::Support(Box::new(outcome.clone()))));
        Ok(outcome)
    }

    async fn load(&self, id: &EntityId) -> Result<Entity> {
        Ok(self.ctx.store.load_or_default(id, &self.ctx.config).await?)
    }

    fn env(&self, context: EffectContext) -> ActionEnv<'_> {
        ActionEnv {
            now: self.ctx.clock.now(),
            action_seed: rand::random(),
            context,
            config: &self.ctx.config,
            rng: &*self.rng,
        }
    }

    fn rejected(&self, entity: &EntityId, action: &str, err: CombatError) -> RuntimeError {
        self.log_rejection(entity, action, err.into())
    }

    fn log_rejection(&self, entity: &EntityId, action: &str, err: RuntimeError) -> RuntimeError {
        if let Some(reason) = err.as_rejection() {
            warn!(
                entity = %entity,
                action,
                code = reason.error_code(),
                reason = %reason,
                "action rejected"
            );
        }
        err
    }
}
