//! Cooperative scheduling of phase continuations.
//!
//! The sequencer never runs more than one pending continuation. Each one is
//! tagged with the round and phase that scheduled it; only an exact match
//! may fire, so a continuation outliving its round or phase is dead.
//!
//! Time is virtual: the clock only moves when the driver calls `advance`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::core::RoundId;

/// A scheduled step out of a timed phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Continuation {
    /// Round that scheduled it.
    pub round: RoundId,
    /// Phase it completes.
    pub phase: Phase,
    /// Clock time at which it comes due.
    pub due: Duration,
}

/// Virtual clock plus the single pending continuation.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    now: Duration,
    pending: Option<Continuation>,
}

impl Schedule {
    /// Create an empty schedule at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn pending(&self) -> Option<Continuation> {
        self.pending
    }

    /// Schedule the continuation for `phase`, due `delay` after `from`.
    ///
    /// Replaces whatever was pending.
    pub fn schedule(&mut self, round: RoundId, phase: Phase, from: Duration, delay: Duration) -> Continuation {
        let continuation = Continuation {
            round,
            phase,
            due: from + delay,
        };
        if let Some(old) = self.pending.replace(continuation) {
            log::warn!("{}: replaced pending {} continuation", old.round, old.phase);
        }
        continuation
    }

    /// Drop the pending continuation.
    pub fn cancel(&mut self) -> Option<Continuation> {
        self.pending.take()
    }

    /// Take the pending continuation if it is exactly `continuation`.
    pub fn claim(&mut self, continuation: &Continuation) -> Option<Continuation> {
        match self.pending {
            Some(p) if p.round == continuation.round && p.phase == continuation.phase => self.pending.take(),
            _ => None,
        }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, elapsed: Duration) {
        self.now += elapsed;
    }

    /// Take the pending continuation if it has come due.
    pub fn take_due(&mut self) -> Option<Continuation> {
        match self.pending {
            Some(p) if p.due <= self.now => self.pending.take(),
            _ => None,
        }
    }
}
