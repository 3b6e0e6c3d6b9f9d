//! Unified error types surfaced by the runtime API.
//!
//! Separates rule rejections, which a player caused and should be shown,
//! from faults in storage or worker coordination.

use gotvalis_core::{CombatError, ErrorSeverity, GameError};
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Rejected(#[from] CombatError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("tick worker command channel closed")]
    CommandChannelClosed,

    #[error("tick worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("tick worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires an entity store before building")]
    MissingStore,

    #[error("item catalog could not be loaded: {0}")]
    ItemCatalog(String),
}

impl RuntimeError {
    /// True for plain rule rejections: nothing was written and the request
    /// can be answered with the error message.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The rule rejection, if this is one.
    pub fn as_rejection(&self) -> Option<&CombatError> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rejected(err) => err.severity(),
            Self::Repository(_) | Self::ReplyChannelClosed(_) | Self::ItemCatalog(_) => {
                ErrorSeverity::Internal
            }
            Self::CommandChannelClosed | Self::WorkerJoin(_) | Self::MissingStore => {
                ErrorSeverity::Fatal
            }
        }
    }
}
