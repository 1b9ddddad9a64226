//! Error types.
//!
//! None of these abort the game. Targeting and ability errors end one
//! ability's resolution and are surfaced as a toast or a log line; the
//! shared state is never left half-written because every mutation is a
//! whole-state replacement.

use thiserror::Error;

use super::CardId;
use crate::board::RowId;

/// Why a chosen target was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("{0} is not on the board")]
    UnknownCard(CardId),

    #[error("{0} is defeated")]
    Defeated(CardId),

    #[error("target must be an ally")]
    NotAlly,

    #[error("target must be an enemy")]
    NotEnemy,

    #[error("turrets cannot be targeted by this ability")]
    TurretNotAllowed,

    #[error("row {0} is not a valid target here")]
    RowOutOfScope(RowId),

    #[error("row {0} is full")]
    RowFull(RowId),
}

/// Failure inside a hero callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbilityError {
    #[error("invalid target: {0}")]
    Target(#[from] TargetError),

    #[error("{0} does not exist")]
    MissingCard(CardId),

    #[error("not enough synergy: need {needed}, row has {available}")]
    InsufficientSynergy { needed: i64, available: i64 },

    #[error("ultimate already used this round")]
    UltimateUsed,

    #[error("ability cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// Configuration loading failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
