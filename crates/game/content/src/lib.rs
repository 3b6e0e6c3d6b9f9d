//! Data-driven content definitions and loaders.
//!
//! This crate houses the static item catalog and the loader for RON item
//! files. The default catalog ships in `data/items.ron` and is embedded at
//! compile time; deployments can point the runtime at another file.
//!
//! Content is consumed by the runtime's item oracle and never appears in
//! entity state beyond item ids.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ItemCatalog, ItemLoader, LoadResult};
