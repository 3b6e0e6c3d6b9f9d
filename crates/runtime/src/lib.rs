//! Async runtime around the GotValis combat rules.
//!
//! This crate wires the pure rules of `gotvalis-core` to persistence, a clock,
//! per-entity locking and the periodic status-effect sweep. Consumers embed
//! [`Runtime`] and talk to it through the cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`services`] runs player actions and effect management as transactions
//! - [`events`] provides the topic-based event bus for notifications
//! - [`workers`] keeps the tick sweep loop internal to the crate
//! - [`oracle`], [`repository`], [`clock`] and [`locks`] are the adapters
//!   the services are built on
pub mod api;
pub mod clock;
pub mod events;
pub mod locks;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod services;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{CombatEvent, EffectEvent, Event, EventBus, TickReport, Topic};
pub use locks::EntityLocks;
pub use oracle::ItemOracleImpl;
pub use repository::{
    CounterField, EffectScan, EntityStore, FieldDelta, FileEntityStore, InMemoryEntityStore,
    RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use services::{ActiveEffectView, CombatService, CombatStatus, EffectService};
pub use workers::{SweepReport, TickWorker};
