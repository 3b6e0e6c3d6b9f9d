use gotvalis_core::{
    ApplyOutcome, EffectContext, EffectInstance, EntityId, StatusEffectKind, Timestamp,
};
use tracing::{debug, info};

use super::ServiceContext;
use crate::api::Result;
use crate::events::{EffectEvent, Event};

/// Status-effect lifecycle by entity id.
///
/// Unknown entities are rejected with `NotFound`; effects are only ever
/// applied to records that already exist.
#[derive(Clone)]
pub struct EffectService {
    ctx: ServiceContext,
}

impl EffectService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply `kind` now, refreshing an active instance of the same kind.
    pub async fn apply(
        &self,
        id: &EntityId,
        kind: StatusEffectKind,
        context: EffectContext,
    ) -> Result<ApplyOutcome> {
        let _guard = self.ctx.locks.lock(id).await;
        let mut entity = self.ctx.load_existing(id).await?;

        let outcome = entity.effects.apply(kind, self.ctx.clock.now(), context);
        self.ctx.store.upsert(&entity).await?;

        info!(entity = %id, effect = %kind, refreshed = outcome.refreshed, "status effect applied");
        self.ctx.events.publish(Event::Effects(EffectEvent::Applied {
            entity: id.clone(),
            outcome,
        }));
        Ok(outcome)
    }

    /// [`apply`](Self::apply) with a catalog name such as `"poison"`.
    pub async fn apply_named(
        &self,
        id: &EntityId,
        name: &str,
        context: EffectContext,
    ) -> Result<ApplyOutcome> {
        let kind = StatusEffectKind::from_name(name)?;
        self.apply(id, kind, context).await
    }

    /// Remove `kind` whether or not it has expired yet.
    pub async fn remove(&self, id: &EntityId, kind: StatusEffectKind) -> Result<EffectInstance> {
        let _guard = self.ctx.locks.lock(id).await;
        let mut entity = self.ctx.load_existing(id).await?;

        let removed = entity.effects.remove(kind)?;
        self.ctx.store.upsert(&entity).await?;

        info!(entity = %id, effect = %kind, "status effect removed");
        self.ctx.events.publish(Event::Effects(EffectEvent::Removed {
            entity: id.clone(),
            kind,
        }));
        Ok(removed)
    }

    /// Effects still active at `now`. Read-only.
    pub async fn list_active(&self, id: &EntityId, now: Timestamp) -> Result<Vec<EffectInstance>> {
        let entity = self.ctx.load_existing(id).await?;
        Ok(entity.effects.active_at(now).cloned().collect())
    }

    /// Drop expired instances from the stored record. Returns how many went.
    pub async fn cleanup_expired(&self, id: &EntityId, now: Timestamp) -> Result<usize> {
        let _guard = self.ctx.locks.lock(id).await;
        let mut entity = self.ctx.load_existing(id).await?;

        let expired: Vec<_> = entity
            .effects
            .iter()
            .filter(|effect| !effect.is_active_at(now))
            .map(|effect| effect.kind)
            .collect();
        let removed = entity.effects.cleanup_expired(now);
        if removed == 0 {
            return Ok(0);
        }

        self.ctx.store.upsert(&entity).await?;
        debug!(entity = %id, removed, "expired effects cleaned up");
        self.ctx.events.publish(Event::Effects(EffectEvent::Expired {
            entity: id.clone(),
            kinds: expired,
        }));
        Ok(removed)
    }
}
