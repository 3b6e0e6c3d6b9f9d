//! Transactional services over the entity store.
//!
//! Each public operation locks the entities it touches, loads them, runs the
//! pure rules from `gotvalis-core`, persists the result and publishes an
//! event. A rejection leaves the store untouched.

mod combat;
mod effects;

use std::sync::Arc;

use gotvalis_core::{CombatConfig, CombatError, Entity, EntityId};

use crate::api::Result;
use crate::clock::Clock;
use crate::events::EventBus;
use crate::locks::EntityLocks;
use crate::repository::EntityStore;

pub use combat::{ActiveEffectView, CombatService, CombatStatus};
pub use effects::EffectService;

/// Dependencies shared by every service.
#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub store: Arc<dyn EntityStore>,
    pub locks: Arc<EntityLocks>,
    pub clock: Arc<dyn Clock>,
    pub events: EventBus,
    pub config: Arc<CombatConfig>,
}

impl ServiceContext {
    /// Load a stored entity or reject with `NotFound`.
    pub async fn load_existing(&self, id: &EntityId) -> Result<Entity> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CombatError::entity_not_found(id).into())
    }
}
