//! Cards, rounds, and the deck factory.
//!
//! ## Key Types
//!
//! - `Card`: face value plus the mutable slot/priority/facing/lock state
//! - `Round`: the active set of cards and its invariants
//! - `DeckFactory`: builds a round from a requested count and a face-value pool

pub mod card;
pub mod deck;
pub mod round;

pub use card::Card;
pub use deck::DeckFactory;
pub use round::{CardSet, Round};
