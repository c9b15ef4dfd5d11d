//! Card state.
//!
//! A `Card` keeps its index and face value for life. Slot, priority,
//! position, facing, and lock are rewritten by the sequencer as the round
//! moves through its phases; outside the crate they are read-only.

use serde::{Deserialize, Serialize};

use crate::core::{CardIndex, Priority, Slot};
use crate::table::Position;

/// One card of a round.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    index: CardIndex,
    face_value: String,
    pub(crate) slot: Slot,
    /// `None` until the first priority permutation is applied.
    pub(crate) priority: Option<Priority>,
    pub(crate) position: Position,
    pub(crate) face_up: bool,
    pub(crate) locked: bool,
}

impl Card {
    /// A freshly built card: sitting face down and locked at the deck,
    /// assigned to the slot matching its index.
    #[must_use]
    pub fn new(index: CardIndex, face_value: impl Into<String>) -> Self {
        Self {
            index,
            face_value: face_value.into(),
            slot: Slot::new(index.0),
            priority: None,
            position: Position::Deck,
            face_up: false,
            locked: true,
        }
    }

    #[must_use]
    pub fn index(&self) -> CardIndex {
        self.index
    }

    #[must_use]
    pub fn face_value(&self) -> &str {
        &self.face_value
    }

    #[must_use]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    /// Does the card currently reject reveal input?
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Can a click on this card reveal it right now?
    #[must_use]
    pub fn is_revealable(&self) -> bool {
        !self.locked && !self.face_up
    }
}
