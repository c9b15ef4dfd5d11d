//! Engine configuration.
//!
//! - `CountRange`: how many cards a round may hold, and how requests are clamped
//! - `PhaseTimings`: nominal settle delay of every timed phase
//! - `EngineConfig`: combines the above with the face-value pool, slot layout,
//!   and optional seed
//!
//! Configurations are checked once, when the sequencer is created.

use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::error::{ConfigurationError, InvalidCardCount};
use crate::table::SlotLayout;

/// Face values used when none are configured.
pub const DEFAULT_POOL: [&str; 5] = ["A", "K", "Q", "J", "10"];

/// Most cards a round can hold. Card indices, slots, and priorities are `u8`.
pub const MAX_CARDS: usize = u8::MAX as usize;

/// Inclusive range of supported card counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl Default for CountRange {
    fn default() -> Self {
        Self { min: 3, max: 5 }
    }
}

impl CountRange {
    /// Create a count range.
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Coerce a requested count into the range.
    ///
    /// A missing request or zero means `min`. Anything else is clamped.
    ///
    /// ```
    /// use card_shuffle::core::CountRange;
    ///
    /// let range = CountRange::new(3, 5);
    /// assert_eq!(range.clamp(None), 3);
    /// assert_eq!(range.clamp(Some(0)), 3);
    /// assert_eq!(range.clamp(Some(4)), 4);
    /// assert_eq!(range.clamp(Some(99)), 5);
    /// ```
    #[must_use]
    pub fn clamp(&self, requested: Option<i64>) -> usize {
        match requested {
            None | Some(0) => self.min,
            Some(n) if n < self.min as i64 => self.min,
            Some(n) if n > self.max as i64 => self.max,
            Some(n) => n as usize,
        }
    }

    /// Strict variant of [`clamp`](Self::clamp): out-of-range counts are rejected.
    pub fn check(&self, requested: i64) -> Result<usize, InvalidCardCount> {
        if self.contains(requested) {
            Ok(requested as usize)
        } else {
            Err(InvalidCardCount {
                requested,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Is `count` inside the range?
    #[must_use]
    pub fn contains(&self, count: i64) -> bool {
        count >= self.min as i64 && count <= self.max as i64
    }
}

/// Read a card count typed by a player.
///
/// Leading whitespace is skipped, then an optional sign and the leading
/// digits are read. Anything after the digits is ignored. Input without
/// leading digits yields `None`.
///
/// ```
/// use card_shuffle::core::parse_count_input;
///
/// assert_eq!(parse_count_input("4"), Some(4));
/// assert_eq!(parse_count_input("  5 cards"), Some(5));
/// assert_eq!(parse_count_input("-2"), Some(-2));
/// assert_eq!(parse_count_input("many"), None);
/// assert_eq!(parse_count_input(""), None);
/// ```
#[must_use]
pub fn parse_count_input(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    // Saturate absurdly long inputs; they clamp to `max` anyway.
    let value = rest[..digits_end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Nominal duration of each timed phase.
///
/// Renderers receive these with every phase notification and may report
/// completion earlier or later via `Sequencer::phase_complete`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimings {
    /// Cards flipping face down before the priority permutation lands.
    pub flip_down: Duration,
    /// Travel to the gather point plus the pause there.
    pub gather: Duration,
    /// Travel from the gather point to the new slots.
    pub redistribute: Duration,
    /// Cards flying from the deck corner to their slots.
    pub deal: Duration,
    /// Retired cards leaving the table on restart.
    pub retire: Duration,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            flip_down: Duration::from_millis(1100),
            gather: Duration::from_millis(1500),
            redistribute: Duration::from_millis(1000),
            deal: Duration::from_millis(1000),
            retire: Duration::from_millis(1000),
        }
    }
}

impl PhaseTimings {
    /// Every phase completes immediately. Handy for headless drivers.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            flip_down: Duration::ZERO,
            gather: Duration::ZERO,
            redistribute: Duration::ZERO,
            deal: Duration::ZERO,
            retire: Duration::ZERO,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Supported card counts.
    pub count_range: CountRange,

    /// Face values cards are drawn from.
    pub pool: Vec<String>,

    /// Phase settle delays.
    pub timings: PhaseTimings,

    /// Slot geometry.
    pub layout: SlotLayout,

    /// Fixed seed for reproducible sessions. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            count_range: CountRange::default(),
            pool: DEFAULT_POOL.iter().map(|s| (*s).to_string()).collect(),
            timings: PhaseTimings::default(),
            layout: SlotLayout::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the supported card count range.
    #[must_use]
    pub fn with_count_range(mut self, min: usize, max: usize) -> Self {
        self.count_range = CountRange::new(min, max);
        self
    }

    /// Replace the face-value pool.
    #[must_use]
    pub fn with_pool<I, S>(mut self, pool: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pool = pool.into_iter().map(Into::into).collect();
        self
    }

    /// Set the phase timings.
    #[must_use]
    pub fn with_timings(mut self, timings: PhaseTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Set the slot layout.
    #[must_use]
    pub fn with_layout(mut self, layout: SlotLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of distinct symbols in the pool.
    #[must_use]
    pub fn distinct_pool_size(&self) -> usize {
        self.pool.iter().collect::<FxHashSet<_>>().len()
    }

    /// Check that rounds of every supported size can be built.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let CountRange { min, max } = self.count_range;
        if min == 0 {
            return Err(ConfigurationError::ZeroMinimum);
        }
        if min > max {
            return Err(ConfigurationError::EmptyCountRange { min, max });
        }
        if max > MAX_CARDS {
            return Err(ConfigurationError::TooManyCards { required: max, limit: MAX_CARDS });
        }

        let available = self.distinct_pool_size();
        if available < max {
            return Err(ConfigurationError::InsufficientFaceValues { available, required: max });
        }

        Ok(())
    }
}
