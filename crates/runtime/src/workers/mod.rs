//! Worker tasks that back the runtime orchestration.
//!
//! The tick worker sweeps status effects on a fixed period and on demand.

mod ticker;

pub(crate) use ticker::Command;
pub use ticker::{SweepReport, TickWorker};
