//! # card-shuffle
//!
//! A shuffle sequencing engine for "find the card" reveal games: a few
//! cards are shown face up, turned face down, gathered, redistributed to
//! new slots, and then revealed one click at a time.
//!
//! ## Design Principles
//!
//! 1. **Renderer-Agnostic**: The engine owns all card state and pushes
//!    placements to a [`Renderer`]. Drawing, input, and timers live outside.
//!
//! 2. **One Continuation**: Each timed phase schedules exactly one
//!    continuation tagged with its round. Restarting cancels it, and a
//!    stale continuation can never touch a newer round.
//!
//! 3. **Never Throw Across the Boundary**: Operations return a [`Step`].
//!    Requests the current phase cannot serve are ignored, unchanged.
//!
//! 4. **Deterministic When Seeded**: Face draws, priority permutations, and
//!    slot permutations come from independent ChaCha8 streams.
//!
//! ## Modules
//!
//! - `core`: Identities, RNG, configuration, errors
//! - `cards`: Card state, rounds, and the deck factory
//! - `table`: Slot geometry and card positions
//! - `sequencer`: Phase machine, scheduling, and the renderer contract

pub mod cards;
pub mod core;
pub mod sequencer;
pub mod table;

// Re-export commonly used types
pub use crate::core::{
    parse_count_input, CardIndex, ConfigurationError, CountRange, EngineConfig, EngineError,
    InvalidCardCount, PhaseTimings, PhaseViolation, Priority, RoundId, ShuffleRng, Slot,
};

pub use crate::cards::{Card, DeckFactory, Round};

pub use crate::table::{Position, SlotLayout};

pub use crate::sequencer::{
    Continuation, Notice, Operation, Phase, Placement, RenderEvent, RenderLog, Renderer, Sequencer,
    Step,
};
