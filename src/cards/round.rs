//! The active set of cards.
//!
//! ## Invariants
//!
//! - Slots across all cards are a permutation of `0..N`
//! - Once assigned, priorities across all cards are a permutation of `1..=N`
//! - Face values never change after the round is built
//!
//! Only the sequencer mutates a round. Every mutation goes through a method
//! here that touches all cards at once, so the invariants hold between calls.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::Card;
use crate::core::{CardIndex, Priority, RoundId, Slot};
use crate::sequencer::Placement;
use crate::table::{Position, SlotLayout};

/// Cards of a round, inline for the usual handful.
pub type CardSet = SmallVec<[Card; 8]>;

/// One play-through, from deal to restart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    id: RoundId,
    cards: CardSet,
    has_shuffled_once: bool,
}

impl Round {
    /// Create a round from freshly built cards.
    ///
    /// Card `i` must have index `i`.
    #[must_use]
    pub fn new(id: RoundId, cards: CardSet) -> Self {
        debug_assert!(cards.iter().enumerate().all(|(i, c)| c.index().index() == i));
        Self {
            id,
            cards,
            has_shuffled_once: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> RoundId {
        self.id
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in index order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, index: CardIndex) -> Option<&Card> {
        self.cards.get(index.index())
    }

    /// The card resting at `slot`, if any.
    #[must_use]
    pub fn card_at_slot(&self, slot: Slot) -> Option<&Card> {
        self.cards.iter().find(|c| c.slot() == slot)
    }

    /// Has a shuffle been accepted this round?
    #[must_use]
    pub fn has_shuffled_once(&self) -> bool {
        self.has_shuffled_once
    }

    /// Face values in card index order.
    pub fn face_values(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(Card::face_value)
    }

    /// Slot of each card, in card index order.
    #[must_use]
    pub fn slot_permutation(&self) -> SmallVec<[u8; 8]> {
        self.cards.iter().map(|c| c.slot().0).collect()
    }

    /// Priority of each card, in card index order. `None` until assigned.
    #[must_use]
    pub fn priority_permutation(&self) -> Option<SmallVec<[u8; 8]>> {
        self.cards.iter().map(|c| c.priority().map(Priority::raw)).collect()
    }

    /// Do the slots cover `0..N` exactly once?
    #[must_use]
    pub fn slots_are_permutation(&self) -> bool {
        covers_exactly(self.cards.iter().map(|c| c.slot().index()), 0, self.len())
    }

    /// Do the priorities cover `1..=N` exactly once?
    #[must_use]
    pub fn priorities_are_permutation(&self) -> bool {
        match self.priority_permutation() {
            Some(p) => covers_exactly(p.iter().map(|&v| v as usize), 1, self.len()),
            None => false,
        }
    }

    /// Full visual state of a card.
    #[must_use]
    pub fn placement(&self, card: &Card, layout: &SlotLayout) -> Placement {
        Placement {
            card: card.index(),
            slot: card.slot(),
            position: card.position(),
            offset_x: layout.offset(card.position(), self.len()),
            priority: card.priority(),
            face_up: card.face_up,
            locked: card.locked,
        }
    }

    /// Placements of every card, in card index order.
    pub fn placements<'a>(&'a self, layout: &'a SlotLayout) -> impl Iterator<Item = Placement> + 'a {
        self.cards.iter().map(move |c| self.placement(c, layout))
    }

    // === Mutation (sequencer only) ===

    pub(crate) fn mark_shuffled(&mut self) {
        self.has_shuffled_once = true;
    }

    /// Move every card to its own slot, face up.
    pub(crate) fn deal(&mut self) {
        for card in &mut self.cards {
            card.position = Position::Slot(card.slot);
            card.face_up = true;
        }
    }

    pub(crate) fn flip_all_down(&mut self) {
        for card in &mut self.cards {
            card.face_up = false;
        }
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        for card in &mut self.cards {
            card.locked = locked;
        }
    }

    pub(crate) fn gather(&mut self) {
        for card in &mut self.cards {
            card.position = Position::Gather;
        }
    }

    pub(crate) fn send_offstage(&mut self) {
        for card in &mut self.cards {
            card.position = Position::Offstage;
        }
    }

    /// Give card `i` priority `ranks[i] + 1`.
    ///
    /// `ranks` must be a permutation of `0..N`.
    pub(crate) fn assign_priorities(&mut self, ranks: &[usize]) {
        debug_assert!(covers_exactly(ranks.iter().copied(), 0, self.len()));
        for (card, &rank) in self.cards.iter_mut().zip(ranks) {
            card.priority = Priority::from_rank(rank);
        }
    }

    /// Give card `i` slot `slots[i]` and move it there.
    ///
    /// `slots` must be a permutation of `0..N`.
    pub(crate) fn assign_slots(&mut self, slots: &[usize]) {
        debug_assert!(covers_exactly(slots.iter().copied(), 0, self.len()));
        for (card, &slot) in self.cards.iter_mut().zip(slots) {
            card.slot = Slot::new(slot as u8);
            card.position = Position::Slot(card.slot);
        }
    }

    pub(crate) fn card_mut(&mut self, index: CardIndex) -> Option<&mut Card> {
        self.cards.get_mut(index.index())
    }
}

/// Does `values` hold every number in `start..start + n` exactly once?
fn covers_exactly(values: impl Iterator<Item = usize>, start: usize, n: usize) -> bool {
    let mut seen: SmallVec<[bool; 8]> = SmallVec::from_elem(false, n);
    let mut count = 0;
    for v in values {
        let Some(offset) = v.checked_sub(start) else {
            return false;
        };
        match seen.get_mut(offset) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
        count += 1;
    }
    count == n
}
