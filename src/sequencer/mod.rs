//! Shuffle sequencing: the phase machine that takes a round from dealt to
//! revealed.
//!
//! ## Phases
//!
//! `Idle -> Dealt -> FlippingDown -> Gathering -> Redistributing -> Settled -> Revealed`,
//! with `Restarting` reachable from anywhere and landing on a fresh `Idle`.
//!
//! The three middle phases are timed. Entering one schedules a single
//! [`Continuation`] tagged with the round and phase. It fires either when
//! the virtual clock passes its due time ([`Sequencer::advance`]) or when
//! the renderer reports the animation finished ([`Sequencer::phase_complete`]).
//!
//! ## Guarantees
//!
//! - Cards are locked from the moment a shuffle is accepted until `Settled`
//! - The priority permutation is applied before `Gathering` begins
//! - The slot permutation is applied before `Settled`, so before any reveal
//! - A restart cancels the pending continuation; nothing fires for a
//!   retired round

mod engine;
mod phase;
mod renderer;
mod schedule;

pub use engine::Sequencer;
pub use phase::{Operation, Phase};
pub use renderer::{Notice, Placement, RenderEvent, RenderLog, Renderer};
pub use schedule::{Continuation, Schedule};

use serde::{Deserialize, Serialize};

use crate::core::{CardIndex, PhaseViolation};

/// Outcome of a sequencer operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// The request was applied and the sequencer is now in this phase.
    Entered(Phase),
    /// The card was turned face up.
    Revealed(CardIndex),
    /// Nothing changed.
    Ignored(PhaseViolation),
}

impl Step {
    /// Did the request change anything?
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, Step::Ignored(_))
    }

    /// Why the request was refused, if it was.
    #[must_use]
    pub fn violation(&self) -> Option<PhaseViolation> {
        match self {
            Step::Ignored(v) => Some(*v),
            _ => None,
        }
    }
}
