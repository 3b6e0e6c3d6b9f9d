//! In-memory repository implementations for testing and development.

mod entity;

pub use entity::InMemoryEntityStore;
