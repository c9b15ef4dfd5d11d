//! Identity types for cards, rounds, slots, and draw priorities.
//!
//! ## Layout
//!
//! - `CardIndex`: `0..N` inside a round, fixed at creation
//! - `Slot`: `0..N`, the horizontal position a card occupies
//! - `Priority`: `1..=N`, the visual stacking order while cards overlap
//! - `RoundId`: starts at 1 and grows by one for every round built
//!
//! ```
//! use card_shuffle::core::{CardIndex, Priority, RoundId, Slot};
//!
//! let card = CardIndex::new(2);
//! assert_eq!(card.index(), 2);
//!
//! let first = RoundId::FIRST;
//! assert_eq!(first.next(), RoundId::new(2));
//!
//! assert_eq!(Slot::new(3).index(), 3);
//! assert_eq!(Priority::from_rank(0), Some(Priority::new(1)));
//! ```

use serde::{Deserialize, Serialize};

/// Stable identity of a card within its round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardIndex(pub u8);

impl CardIndex {
    /// Create a card index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the index as a `usize` for slice access.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every card index of a round with `count` cards.
    ///
    /// Stops at the last index a `u8` can hold.
    pub fn all(count: usize) -> impl Iterator<Item = CardIndex> {
        (0..count).map_while(|i| u8::try_from(i).ok()).map(CardIndex)
    }
}

impl std::fmt::Display for CardIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Identity of a round.
///
/// Continuations and placements carry the round they were produced for,
/// so anything tagged with a retired round can be recognised and dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoundId(pub u32);

impl RoundId {
    /// The id given to the first round a sequencer builds.
    pub const FIRST: RoundId = RoundId(1);

    /// Create a round id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The id the following round will get.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Round({})", self.0)
    }
}

/// A horizontal position on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(pub u8);

impl Slot {
    /// Create a slot.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the slot as a `usize`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

/// Visual stacking order of a card. Higher draws on top.
///
/// Priorities are 1-based: a round of N cards uses `1..=N`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(pub u8);

impl Priority {
    /// Create a priority. Zero is not a valid priority.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        debug_assert!(value > 0);
        Self(value)
    }

    /// Convert a 0-based rank (as produced by a permutation) into a priority.
    ///
    /// `None` if the priority would not fit.
    #[must_use]
    pub fn from_rank(rank: usize) -> Option<Self> {
        rank.checked_add(1)
            .and_then(|value| u8::try_from(value).ok())
            .map(Self)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Priority({})", self.0)
    }
}
