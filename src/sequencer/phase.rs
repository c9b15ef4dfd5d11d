//! Lifecycle phases and the operations that drive them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::PhaseTimings;

/// Lifecycle phase of the sequencer.
///
/// ```text
/// Idle -> Dealt -> FlippingDown -> Gathering -> Redistributing -> Settled -> Revealed
///   ^                                                                          |
///   +------------------------------ Restarting <------------- (any phase) -----+
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Cards built but not placed.
    Idle,
    /// Cards face up at their slots.
    Dealt,
    /// Cards turning face down. Leaves with the priority permutation.
    FlippingDown,
    /// Cards piled at the gather point.
    Gathering,
    /// Cards travelling to their new slots.
    Redistributing,
    /// Cards unlocked, waiting for a reveal.
    Settled,
    /// At least one card revealed.
    Revealed,
    /// Old round leaving, new round being built.
    Restarting,
}

impl Phase {
    /// Phases that advance on their own after a settle delay.
    #[must_use]
    pub const fn is_timed(self) -> bool {
        matches!(self, Phase::FlippingDown | Phase::Gathering | Phase::Redistributing)
    }

    /// The phase a timed phase advances to.
    #[must_use]
    pub const fn successor(self) -> Option<Phase> {
        match self {
            Phase::FlippingDown => Some(Phase::Gathering),
            Phase::Gathering => Some(Phase::Redistributing),
            Phase::Redistributing => Some(Phase::Settled),
            _ => None,
        }
    }

    /// Can cards be revealed in this phase?
    #[must_use]
    pub const fn accepts_reveal(self) -> bool {
        matches!(self, Phase::Settled | Phase::Revealed)
    }

    /// Nominal animation length of the phase, if it animates.
    ///
    /// For timed phases this is also the settle delay before they advance.
    #[must_use]
    pub fn animation(self, timings: &PhaseTimings) -> Option<Duration> {
        match self {
            Phase::Dealt => Some(timings.deal),
            Phase::FlippingDown => Some(timings.flip_down),
            Phase::Gathering => Some(timings.gather),
            Phase::Redistributing => Some(timings.redistribute),
            Phase::Restarting => Some(timings.retire),
            Phase::Idle | Phase::Settled | Phase::Revealed => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Dealt => "dealt",
            Phase::FlippingDown => "flipping down",
            Phase::Gathering => "gathering",
            Phase::Redistributing => "redistributing",
            Phase::Settled => "settled",
            Phase::Revealed => "revealed",
            Phase::Restarting => "restarting",
        };
        f.write_str(name)
    }
}

/// A request made of the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Deal,
    Shuffle,
    Reveal,
    PhaseComplete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Deal => "deal",
            Operation::Shuffle => "shuffle",
            Operation::Reveal => "reveal",
            Operation::PhaseComplete => "phase completion",
        };
        f.write_str(name)
    }
}
