//! Repository layer for entity records.
//!
//! Repositories hold the data that CHANGES during play: HP, shields, effects,
//! inventories, coins and counters. Static content (the item catalog) is
//! served by oracles instead.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileEntityStore;
pub use memory::InMemoryEntityStore;
pub use traits::{CounterField, EffectScan, EntityStore, FieldDelta};
