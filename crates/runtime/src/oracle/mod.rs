//! Runtime wrappers around static game content.
//!
//! The item catalog is immutable at runtime; dynamic state lives in
//! repositories.
mod items;

pub use items::ItemOracleImpl;
