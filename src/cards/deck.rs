//! Deck factory: builds the cards of a new round.
//!
//! ```
//! use card_shuffle::cards::DeckFactory;
//! use card_shuffle::core::{CountRange, RoundId, ShuffleRng};
//!
//! let factory = DeckFactory::new(CountRange::new(3, 5), ["A", "K", "Q", "J", "10"]);
//! let mut rng = ShuffleRng::new(42);
//!
//! let round = factory.build_round(RoundId::FIRST, Some(4), &mut rng).unwrap();
//! assert_eq!(round.len(), 4);
//! ```

use rustc_hash::FxHashSet;

use super::card::Card;
use super::round::{CardSet, Round};
use crate::core::{
    CardIndex, ConfigurationError, CountRange, EngineConfig, RoundId, ShuffleRng, MAX_CARDS,
};

/// Builds rounds from a pool of face values.
#[derive(Clone, Debug)]
pub struct DeckFactory {
    range: CountRange,
    /// Distinct face values in first-seen order.
    pool: Vec<String>,
}

impl DeckFactory {
    /// Create a factory. Duplicate pool entries are dropped.
    pub fn new<I, S>(range: CountRange, pool: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = FxHashSet::default();
        let pool = pool
            .into_iter()
            .map(Into::into)
            .filter(|face: &String| seen.insert(face.clone()))
            .collect();
        Self { range, pool }
    }

    /// Create a factory from an engine configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.count_range, config.pool.iter().cloned())
    }

    #[must_use]
    pub fn count_range(&self) -> CountRange {
        self.range
    }

    /// Distinct face values available.
    #[must_use]
    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Build the cards for a new round.
    ///
    /// The requested count is clamped into the supported range. Face values
    /// are drawn without repetition: the distinct pool is shuffled and card
    /// `i` takes the `i`-th symbol. Cards start face down and locked at the
    /// deck, each assigned the slot matching its index.
    pub fn build_round(
        &self,
        id: RoundId,
        requested: Option<i64>,
        rng: &mut ShuffleRng,
    ) -> Result<Round, ConfigurationError> {
        let count = self.range.clamp(requested);
        if count > MAX_CARDS {
            return Err(ConfigurationError::TooManyCards { required: count, limit: MAX_CARDS });
        }
        if self.pool.len() < count {
            return Err(ConfigurationError::InsufficientFaceValues {
                available: self.pool.len(),
                required: count,
            });
        }

        let mut faces: Vec<&str> = self.pool.iter().map(String::as_str).collect();
        rng.shuffle(&mut faces);

        let cards: CardSet = CardIndex::all(count)
            .zip(faces)
            .map(|(index, face)| Card::new(index, face))
            .collect();

        Ok(Round::new(id, cards))
    }
}
