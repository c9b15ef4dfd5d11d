//! Core engine types: identities, RNG, configuration, errors.

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;

pub use config::{
    parse_count_input, CountRange, EngineConfig, PhaseTimings, DEFAULT_POOL, MAX_CARDS,
};
pub use error::{ConfigurationError, EngineError, InvalidCardCount, PhaseViolation};
pub use ids::{CardIndex, Priority, RoundId, Slot};
pub use rng::{Permutation, ShuffleRng, ShuffleRngState};
