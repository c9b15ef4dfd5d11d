//! Error types.
//!
//! Only configuration problems are fatal. A bad card count is recovered by
//! clamping, and a request the current phase cannot serve is reported as a
//! [`PhaseViolation`] inside an ignored step, never as an `Err`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::CardIndex;
use crate::sequencer::{Operation, Phase};

/// The engine cannot build rounds with this configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("face-value pool has {available} distinct symbols, need at least {required}")]
    InsufficientFaceValues { available: usize, required: usize },
    #[error("card count range {min}..={max} is empty")]
    EmptyCountRange { min: usize, max: usize },
    #[error("rounds of {required} cards exceed the limit of {limit}")]
    TooManyCards { required: usize, limit: usize },
    #[error("card count range must start above zero")]
    ZeroMinimum,
}

/// A card count outside the supported range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("card count {requested} outside supported range {min}..={max}")]
pub struct InvalidCardCount {
    pub requested: i64,
    pub min: usize,
    pub max: usize,
}

/// A request the sequencer refused. Nothing changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PhaseViolation {
    #[error("{operation} is not allowed while {phase}")]
    NotAllowed { operation: Operation, phase: Phase },
    #[error("cards have already been shuffled this round")]
    AlreadyShuffled,
    #[error("{0} is locked")]
    CardLocked(CardIndex),
    #[error("{0} is already face up")]
    AlreadyFaceUp(CardIndex),
    #[error("{0} is not part of the current round")]
    UnknownCard(CardIndex),
    #[error("continuation does not match the pending phase")]
    StaleContinuation,
    #[error("no round is ready")]
    NoRound,
}

/// Any error the engine can produce.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    InvalidCardCount(#[from] InvalidCardCount),
    #[error(transparent)]
    PhaseViolation(#[from] PhaseViolation),
}
