//! Error taxonomy for combat rules.
//!
//! Every rejection the rules can produce is an expected, recoverable
//! condition and is returned as a [`CombatError`] value. Infrastructure
//! failures (store unavailable, I/O) never originate here; they belong to
//! the runtime crate.
//!
//! # Design Principles
//!
//! - **Typed rejections**: callers match on variants to render messages
//! - **Severity classification**: [`GameError::severity`] groups variants for
//!   logging and recovery strategies
//! - **No partial state**: a function returning `Err` has not mutated its input

use crate::state::EntityId;
use crate::status::StatusEffectKind;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later (target revived, cooldown over)
/// - **Validation**: the request itself is invalid and should not be retried as is
/// - **Internal**: unexpected state inconsistency, worth investigating
/// - **Fatal**: corrupted state, cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all gotvalis-core errors.
///
/// Provides a uniform interface for error classification across the crate.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics, log fields and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// What a `NotFound` rejection refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Missing {
    Entity(EntityId),
    Effect(StatusEffectKind),
    Item(String),
}

impl core::fmt::Display for Missing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Missing::Entity(id) => write!(f, "entity {id}"),
            Missing::Effect(kind) => write!(f, "effect {kind}"),
            Missing::Item(item) => write!(f, "item {item}"),
        }
    }
}

/// Why an action would have had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoOpReason {
    /// Target is already at max HP.
    HpFull,
    /// Target shield is already at max.
    ShieldFull,
    /// Target carries none of the effects a cure removes.
    NothingToCure,
}

impl core::fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            NoOpReason::HpFull => "HP already full",
            NoOpReason::ShieldFull => "shield already full",
            NoOpReason::NothingToCure => "nothing to cure",
        };
        f.write_str(label)
    }
}

/// Rejections produced by combat rules and action validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("{0} not found")]
    NotFound(Missing),

    #[error("{entity} is already KO")]
    AlreadyKO { entity: EntityId },

    #[error("{entity} is KO and cannot be healed")]
    CannotHealKO { entity: EntityId },

    #[error("unknown status effect `{name}`")]
    InvalidEffect { name: String },

    #[error("{entity} does not own item `{item}`")]
    InsufficientResource { entity: EntityId, item: String },

    #[error("no effect: {0}")]
    NoOp(NoOpReason),

    #[error("an entity cannot attack itself")]
    SelfTarget,

    #[error("{entity} is not KO")]
    NotKO { entity: EntityId },

    #[error("item `{item}` cannot be used for {action}")]
    WrongItemKind { item: String, action: &'static str },

    #[error("attack on cooldown for another {remaining_secs}s")]
    OnCooldown { remaining_secs: u64 },
}

impl CombatError {
    pub fn entity_not_found(id: &EntityId) -> Self {
        Self::NotFound(Missing::Entity(id.clone()))
    }

    pub fn item_not_found(item: &str) -> Self {
        Self::NotFound(Missing::Item(item.to_owned()))
    }
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyKO { .. }
            | Self::CannotHealKO { .. }
            | Self::NoOp(_)
            | Self::NotKO { .. }
            | Self::OnCooldown { .. } => ErrorSeverity::Recoverable,
            Self::NotFound(_)
            | Self::InvalidEffect { .. }
            | Self::InsufficientResource { .. }
            | Self::SelfTarget
            | Self::WrongItemKind { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyKO { .. } => "ALREADY_KO",
            Self::CannotHealKO { .. } => "CANNOT_HEAL_KO",
            Self::InvalidEffect { .. } => "INVALID_EFFECT",
            Self::InsufficientResource { .. } => "INSUFFICIENT_RESOURCE",
            Self::NoOp(_) => "NO_OP",
            Self::SelfTarget => "SELF_TARGET",
            Self::NotKO { .. } => "NOT_KO",
            Self::WrongItemKind { .. } => "WRONG_ITEM_KIND",
            Self::OnCooldown { .. } => "ON_COOLDOWN",
        }
    }
}
