//! Tick worker that drives status effects.
//!
//! Every sweep loads the entities carrying effects, drops the expired ones
//! and applies at most one due tick per effect. Entities are processed one at
//! a time under their lock, so a sweep never races a player action on the
//! same record. A failure on one entity is logged and counted; the sweep
//! moves on.

use std::time::Duration;

use gotvalis_core::{EntityId, StatusEffectKind, Timestamp, resolve_tick};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::api::Result;
use crate::events::{EffectEvent, Event, TickReport};
use crate::services::ServiceContext;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Commands that can be sent to the tick worker
pub(crate) enum Command {
    /// Run a sweep now, at `now` or the clock's current time.
    Sweep {
        now: Option<Timestamp>,
        reply: oneshot::Sender<Result<SweepReport>>,
    },
}

/// Counters for one sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub entities_scanned: usize,
    pub ticks_applied: usize,
    /// Due ticks rejected by the rules (KO bearer). They are still consumed.
    pub ticks_skipped: usize,
    pub effects_expired: usize,
    /// Entities whose processing failed.
    pub failures: usize,
}

impl SweepReport {
    fn is_idle(&self) -> bool {
        self.ticks_applied == 0
            && self.ticks_skipped == 0
            && self.effects_expired == 0
            && self.failures == 0
    }
}

/// Background task that sweeps status effects.
pub struct TickWorker {
    ctx: ServiceContext,
    interval: Duration,
    run_initial_sweep: bool,
    command_rx: mpsc::Receiver<Command>,
    shutdown_rx: watch::Receiver<bool>,
}

impl TickWorker {
    pub(crate) fn new(
        ctx: ServiceContext,
        interval: Duration,
        run_initial_sweep: bool,
        command_rx: mpsc::Receiver<Command>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            ctx,
            interval: interval.max(MIN_INTERVAL),
            run_initial_sweep,
            command_rx,
            shutdown_rx,
        }
    }

    /// Main worker loop. Returns once shutdown is signalled.
    pub async fn run(mut self) {
        info!(interval_secs = self.interval.as_secs(), "tick worker started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if !self.run_initial_sweep {
            // The first tick of an interval completes immediately.
            ticker.tick().await;
        }

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = self.ctx.clock.now();
                    if let Err(err) = self.sweep(now).await {
                        error!(error = %err, "tick sweep failed");
                    }
                }
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("tick worker stopped");
    }

    async fn handle_command(&self, cmd: Command) {
        match cmd {
            Command::Sweep { now, reply } => {
                let now = now.unwrap_or_else(|| self.ctx.clock.now());
                let _ = reply.send(self.sweep(now).await);
            }
        }
    }

    /// Process every entity carrying effects at `now`.
    ///
    /// Fails only when the list of entities cannot be read.
    pub async fn sweep(&self, now: Timestamp) -> Result<SweepReport> {
        let scan = self.ctx.store.scan_active_effects().await?;
        let mut report = SweepReport {
            entities_scanned: scan.entities.len() + scan.unreadable.len(),
            failures: scan.unreadable.len(),
            ..SweepReport::default()
        };
        for id in &scan.unreadable {
            error!(entity = %id, "status effect processing failed: unreadable record");
        }

        for entity in scan.entities {
            if let Err(err) = self.process_entity(&entity.id, now, &mut report).await {
                report.failures += 1;
                error!(entity = %entity.id, error = %err, "status effect processing failed");
            }
        }

        if report.is_idle() {
            debug!(scanned = report.entities_scanned, "tick sweep idle");
        } else {
            info!(
                scanned = report.entities_scanned,
                applied = report.ticks_applied,
                skipped = report.ticks_skipped,
                expired = report.effects_expired,
                failures = report.failures,
                "tick sweep completed"
            );
        }
        self.ctx
            .events
            .publish(Event::Effects(EffectEvent::SweepCompleted(report.clone())));

        Ok(report)
    }

    async fn process_entity(
        &self,
        id: &EntityId,
        now: Timestamp,
        report: &mut SweepReport,
    ) -> Result<()> {
        let _guard = self.ctx.locks.lock(id).await;
        // Reload under the lock; the listing may be stale.
        let Some(mut entity) = self.ctx.store.get(id).await? else {
            return Ok(());
        };

        let expired: Vec<StatusEffectKind> = entity
            .effects
            .iter()
            .filter(|effect| !effect.is_active_at(now))
            .map(|effect| effect.kind)
            .collect();
        entity.effects.cleanup_expired(now);

        let due = entity.effects.due_ticks(now);
        if expired.is_empty() && due.is_empty() {
            return Ok(());
        }

        let mut ticks = Vec::with_capacity(due.len());
        let mut skipped = 0;
        for tick in &due {
            let route = entity
                .effects
                .get(tick.kind)
                .map(|effect| effect.context.clone())
                .unwrap_or_default();

            match resolve_tick(&mut entity, tick, now, &self.ctx.config) {
                Ok(outcome) => {
                    debug!(
                        entity = %id,
                        effect = %tick.kind,
                        value = tick.tick_value,
                        hp = outcome.current_hp,
                        "status effect ticked"
                    );
                    ticks.push(TickReport::new(id.clone(), &outcome, route));
                }
                Err(reason) => {
                    skipped += 1;
                    warn!(entity = %id, effect = %tick.kind, reason = %reason, "tick skipped");
                }
            }
        }

        self.ctx.store.upsert(&entity).await?;

        report.effects_expired += expired.len();
        report.ticks_applied += ticks.len();
        report.ticks_skipped += skipped;

        if !expired.is_empty() {
            self.ctx.events.publish(Event::Effects(EffectEvent::Expired {
                entity: id.clone(),
                kinds: expired,
            }));
        }
        for tick in ticks {
            self.ctx.events.publish(Event::Effects(EffectEvent::Tick(tick)));
        }

        Ok(())
    }
}
