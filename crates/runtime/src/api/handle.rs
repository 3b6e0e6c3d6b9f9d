//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers access to the combat
//! and effect services, on-demand sweeps and topic subscriptions.
use tokio::sync::{broadcast, mpsc, oneshot};

use gotvalis_core::Timestamp;

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::services::{CombatService, EffectService};
use crate::workers::{Command, SweepReport};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    combat: CombatService,
    effects: EffectService,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(
        combat: CombatService,
        effects: EffectService,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            combat,
            effects,
            command_tx,
            event_bus,
        }
    }

    /// Fights, heals, item use, revives and status.
    pub fn combat(&self) -> &CombatService {
        &self.combat
    }

    /// Status-effect lifecycle by entity id.
    pub fn effects(&self) -> &EffectService {
        &self.effects
    }

    /// Run a tick sweep on the worker right away, at the clock's time.
    pub async fn sweep_now(&self) -> Result<SweepReport> {
        self.request_sweep(None).await
    }

    /// Run a tick sweep as if the time were `now`.
    pub async fn sweep_at(&self, now: Timestamp) -> Result<SweepReport> {
        self.request_sweep(Some(now)).await
    }

    async fn request_sweep(&self, now: Option<Timestamp>) -> Result<SweepReport> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Sweep {
                now,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Accepted fights, heals, item use and revives
    /// - `Topic::Effects` - Effect application, removal, expiry and ticks
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use gotvalis_runtime::{Event, EffectEvent, Topic};
    ///
    /// let mut effects = handle.subscribe(Topic::Effects);
    /// while let Ok(Event::Effects(EffectEvent::Tick(report))) = effects.recv().await {
    ///     println!("{}", report.summary());
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }
}
