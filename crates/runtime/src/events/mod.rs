//! Topic-based event bus for runtime events.
//!
//! Services publish every accepted action and every status-effect tick here.
//! The presentation layer subscribes to the topics it renders.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CombatEvent, EffectEvent, TickReport};
