//! Table geometry: where a card sits and how far along the row that is.
//!
//! Slots are spaced evenly from an origin. The gather point is the midpoint
//! of the slots a round actually uses, so a three-card round gathers over
//! its middle card rather than over the middle of a five-slot row.

use serde::{Deserialize, Serialize};

use crate::core::Slot;

/// Where a card currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Stacked at the deck corner, waiting to be dealt.
    Deck,
    /// Resting at a slot in the row.
    Slot(Slot),
    /// Piled at the round's gather point.
    Gather,
    /// Leaving the table after a restart.
    Offstage,
}

/// Horizontal geometry of the row of slots.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotLayout {
    /// Offset of slot 0.
    pub origin: f32,
    /// Distance between neighbouring slots.
    pub spacing: f32,
}

impl Default for SlotLayout {
    fn default() -> Self {
        Self {
            origin: 0.0,
            spacing: 120.0,
        }
    }
}

impl SlotLayout {
    /// Create a layout.
    #[must_use]
    pub const fn new(origin: f32, spacing: f32) -> Self {
        Self { origin, spacing }
    }

    /// Horizontal offset of a slot.
    #[must_use]
    pub fn slot_offset(&self, slot: Slot) -> f32 {
        self.origin + self.spacing * slot.index() as f32
    }

    /// Horizontal offset of the gather point for a round of `count` cards.
    ///
    /// ```
    /// use card_shuffle::table::SlotLayout;
    ///
    /// let layout = SlotLayout::default();
    /// assert_eq!(layout.gather_offset(3), 120.0);
    /// assert_eq!(layout.gather_offset(4), 180.0);
    /// ```
    #[must_use]
    pub fn gather_offset(&self, count: usize) -> f32 {
        let last = count.saturating_sub(1) as f32;
        self.origin + self.spacing * last / 2.0
    }

    /// Horizontal offset of a position. `None` for the deck and off-stage,
    /// which live outside the row.
    #[must_use]
    pub fn offset(&self, position: Position, count: usize) -> Option<f32> {
        match position {
            Position::Slot(slot) => Some(self.slot_offset(slot)),
            Position::Gather => Some(self.gather_offset(count)),
            Position::Deck | Position::Offstage => None,
        }
    }
}
