//! The renderer contract.
//!
//! The sequencer owns all card state and pushes every visual change to a
//! [`Renderer`]. A renderer never mutates a round; it reports player input
//! and finished animations back through the sequencer's operations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::core::{CardIndex, Priority, RoundId, Slot};
use crate::table::Position;

/// Full visual state of one card.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub card: CardIndex,
    /// Slot the card is assigned to, even while it is away at the gather point.
    pub slot: Slot,
    pub position: Position,
    /// Horizontal offset of the position, `None` off the row.
    pub offset_x: Option<f32>,
    /// Stacking order. `None` until the first shuffle assigns one.
    pub priority: Option<Priority>,
    pub face_up: bool,
    pub locked: bool,
}

/// A user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Notice {
    /// Shuffle was requested again in the same round.
    AlreadyShuffled,
    /// The shuffle finished and cards can be revealed.
    Shuffled,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::AlreadyShuffled => {
                f.write_str("Click on a card to reveal it, or press Restart to play again.")
            }
            Notice::Shuffled => f.write_str("Cards are shuffled! Click on any card to reveal."),
        }
    }
}

/// Receives visual updates from the sequencer.
pub trait Renderer {
    /// Apply the visual state of a card.
    fn place_card(&mut self, round: RoundId, placement: &Placement);

    /// Show a message to the player.
    fn notify(&mut self, notice: Notice);

    /// A phase began. `animation` is its nominal length, if it animates.
    ///
    /// Renderers driving their own timers report the end of a timed phase
    /// through `Sequencer::phase_complete`.
    fn phase_entered(&mut self, _round: RoundId, _phase: Phase, _animation: Option<Duration>) {}

    /// The round's cards left the table and will never be placed again.
    fn round_retired(&mut self, _round: RoundId) {}
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn place_card(&mut self, round: RoundId, placement: &Placement) {
        (**self).place_card(round, placement);
    }

    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice);
    }

    fn phase_entered(&mut self, round: RoundId, phase: Phase, animation: Option<Duration>) {
        (**self).phase_entered(round, phase, animation);
    }

    fn round_retired(&mut self, round: RoundId) {
        (**self).round_retired(round);
    }
}

/// Something a renderer was told.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RenderEvent {
    Placed { round: RoundId, placement: Placement },
    Notified(Notice),
    PhaseEntered { round: RoundId, phase: Phase, animation: Option<Duration> },
    Retired(RoundId),
}

/// A renderer that records everything it is told, in order.
///
/// Useful for headless drivers and for asserting on the exact stream of
/// updates a sequence produces.
#[derive(Clone, Debug, Default)]
pub struct RenderLog {
    events: Vec<RenderEvent>,
}

impl RenderLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Phases entered, in order.
    #[must_use]
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::PhaseEntered { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// Notices shown, in order.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Notified(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// Placements applied, in order.
    pub fn placements(&self) -> impl Iterator<Item = (RoundId, &Placement)> {
        self.events.iter().filter_map(|e| match e {
            RenderEvent::Placed { round, placement } => Some((*round, placement)),
            _ => None,
        })
    }
}

impl Renderer for RenderLog {
    fn place_card(&mut self, round: RoundId, placement: &Placement) {
        self.events.push(RenderEvent::Placed {
            round,
            placement: *placement,
        });
    }

    fn notify(&mut self, notice: Notice) {
        self.events.push(RenderEvent::Notified(notice));
    }

    fn phase_entered(&mut self, round: RoundId, phase: Phase, animation: Option<Duration>) {
        self.events.push(RenderEvent::PhaseEntered { round, phase, animation });
    }

    fn round_retired(&mut self, round: RoundId) {
        self.events.push(RenderEvent::Retired(round));
    }
}
