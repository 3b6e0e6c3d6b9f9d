//! File-based repository implementations.

mod entity;

pub use entity::FileEntityStore;
