//! High-level runtime orchestrator.
//!
//! The runtime owns the tick worker, wires up the shared service context and
//! command/shutdown channels, and exposes a builder-based API.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use gotvalis_core::{CombatConfig, ItemOracle, PcgRng, RngOracle};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::clock::{Clock, SystemClock};
use crate::events::EventBus;
use crate::locks::EntityLocks;
use crate::oracle::ItemOracleImpl;
use crate::repository::EntityStore;
use crate::services::{CombatService, EffectService, ServiceContext};
use crate::workers::TickWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// Period of the status-effect sweep.
    pub tick_interval: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Sweep once as soon as the worker starts.
    pub run_initial_sweep: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            tick_interval: Duration::from_secs(30),
            event_buffer_size: 100,
            command_buffer_size: 32,
            run_initial_sweep: true,
        }
    }
}

/// Main runtime that owns the combat services and the tick worker
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    shutdown_tx: watch::Sender<bool>,
    tick_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Stop the tick worker and wait for it to finish.
    ///
    /// A sweep in progress completes first.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        drop(self.handle);

        self.tick_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!("runtime stopped");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    store: Option<Arc<dyn EntityStore>>,
    items: Option<Arc<dyn ItemOracle>>,
    clock: Option<Arc<dyn Clock>>,
    rng: Option<Arc<dyn RngOracle>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            store: None,
            items: None,
            clock: None,
            rng: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required entity store
    pub fn store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Item catalog (default: the built-in catalog)
    pub fn items(mut self, items: Arc<dyn ItemOracle>) -> Self {
        self.items = Some(items);
        self
    }

    /// Time source (default: [`SystemClock`])
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Randomness for crit and infection rolls (default: [`PcgRng`])
    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Build the runtime and spawn the tick worker.
    pub async fn build(self) -> Result<Runtime> {
        let store = self.store.ok_or(RuntimeError::MissingStore)?;
        let items: Arc<dyn ItemOracle> = match self.items {
            Some(items) => items,
            None => Arc::new(ItemOracleImpl::builtin()?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let rng = self.rng.unwrap_or_else(|| Arc::new(PcgRng));

        let config = self.config;
        let events = EventBus::with_capacity(config.event_buffer_size);
        let ctx = ServiceContext {
            store,
            locks: Arc::new(EntityLocks::new()),
            clock,
            events: events.clone(),
            config: Arc::new(config.combat.clone()),
        };

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = TickWorker::new(
            ctx.clone(),
            config.tick_interval,
            config.run_initial_sweep,
            command_rx,
            shutdown_rx,
        );
        let tick_worker_handle = tokio::spawn(worker.run());

        let handle = RuntimeHandle::new(
            CombatService::new(ctx.clone(), items, rng),
            EffectService::new(ctx),
            command_tx,
            events,
        );

        info!(
            tick_interval_secs = config.tick_interval.as_secs(),
            "runtime started"
        );

        Ok(Runtime {
            handle,
            shutdown_tx,
            tick_worker_handle,
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
