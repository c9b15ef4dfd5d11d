//! The shuffle sequencer.
//!
//! Owns the active round and drives it through the phase machine. Every
//! public operation takes the renderer to notify, returns a [`Step`], and
//! either applies a whole transition or changes nothing at all.

use std::time::Duration;

use log::{debug, error, info, warn};
use smallvec::SmallVec;

use super::phase::{Operation, Phase};
use super::renderer::{Notice, Renderer};
use super::schedule::{Continuation, Schedule};
use super::Step;
use crate::cards::{DeckFactory, Round};
use crate::core::{CardIndex, ConfigurationError, EngineConfig, PhaseViolation, RoundId, ShuffleRng};

/// A round plus the random streams reserved for its shuffle.
#[derive(Clone, Debug)]
struct ActiveRound {
    round: Round,
    priority_rng: ShuffleRng,
    slot_rng: ShuffleRng,
}

/// Drives one round at a time through deal, shuffle, reveal, and restart.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use card_shuffle::{EngineConfig, Phase, RenderLog, Sequencer, Step};
///
/// let mut sequencer = Sequencer::new(EngineConfig::new().with_seed(7)).unwrap();
/// let mut renderer = RenderLog::new();
///
/// sequencer.deal(Some(4), &mut renderer);
/// assert_eq!(sequencer.shuffle(&mut renderer), Step::Entered(Phase::FlippingDown));
///
/// // Let the whole shuffle play out.
/// sequencer.advance(Duration::from_secs(10), &mut renderer);
/// assert_eq!(sequencer.phase(), Phase::Settled);
/// ```
#[derive(Clone, Debug)]
pub struct Sequencer {
    config: EngineConfig,
    factory: DeckFactory,
    rng: ShuffleRng,
    phase: Phase,
    active: Option<ActiveRound>,
    next_round: RoundId,
    /// Last requested card count, reused when restarting.
    requested: Option<i64>,
    schedule: Schedule,
}

impl Sequencer {
    /// Create a sequencer and build its first round.
    ///
    /// Fails only if the configuration cannot produce rounds.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let rng = config.seed.map_or_else(ShuffleRng::from_entropy, ShuffleRng::new);
        let mut sequencer = Self {
            factory: DeckFactory::from_config(&config),
            config,
            rng,
            phase: Phase::Idle,
            active: None,
            next_round: RoundId::FIRST,
            requested: None,
            schedule: Schedule::new(),
        };
        sequencer.build_round()?;
        Ok(sequencer)
    }

    // === Read-only views ===

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The active round, if one is built.
    #[must_use]
    pub fn round(&self) -> Option<&Round> {
        self.active.as_ref().map(|a| &a.round)
    }

    /// The continuation waiting to end the current timed phase.
    #[must_use]
    pub fn pending(&self) -> Option<Continuation> {
        self.schedule.pending()
    }

    /// Virtual clock time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.schedule.now()
    }

    /// Card count the next round will be built with.
    #[must_use]
    pub fn requested_count(&self) -> usize {
        self.config.count_range.clamp(self.requested)
    }

    // === Lifecycle operations ===

    /// Deal the round: every card moves to its slot face up.
    ///
    /// Cards stay locked until a shuffle completes. If the clamped count
    /// differs from the prepared round, a new round of that size is built.
    pub fn deal<R: Renderer + ?Sized>(&mut self, requested: Option<i64>, renderer: &mut R) -> Step {
        if self.phase != Phase::Idle {
            return self.ignore(PhaseViolation::NotAllowed { operation: Operation::Deal, phase: self.phase });
        }

        self.requested = requested;
        let count = self.requested_count();
        if self.round().map_or(true, |r| r.len() != count) {
            if let Err(err) = self.build_round() {
                error!("cannot build a round of {count} cards: {err}");
                return self.ignore(PhaseViolation::NoRound);
            }
        }

        let Some(active) = self.active.as_mut() else {
            return self.ignore(PhaseViolation::NoRound);
        };
        active.round.deal();
        self.enter(Phase::Dealt, renderer);
        Step::Entered(Phase::Dealt)
    }

    /// Start the shuffle sequence.
    ///
    /// Only one shuffle runs per round. Asking again surfaces a notice and
    /// changes nothing.
    pub fn shuffle<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Step {
        let phase = self.phase;
        let Some(active) = self.active.as_mut().filter(|_| phase != Phase::Idle) else {
            return self.ignore(PhaseViolation::NotAllowed { operation: Operation::Shuffle, phase });
        };

        if active.round.has_shuffled_once() {
            renderer.notify(Notice::AlreadyShuffled);
            return self.ignore(PhaseViolation::AlreadyShuffled);
        }
        debug_assert_eq!(phase, Phase::Dealt);

        let round = &mut active.round;
        round.mark_shuffled();
        round.set_locked(true);
        round.flip_all_down();
        self.enter(Phase::FlippingDown, renderer);
        Step::Entered(Phase::FlippingDown)
    }

    /// A player clicked a card.
    ///
    /// Reveals it if it is unlocked and still face down; otherwise nothing
    /// happens. Cards reveal independently of each other.
    pub fn on_card_activated<R: Renderer + ?Sized>(&mut self, card: CardIndex, renderer: &mut R) -> Step {
        let phase = self.phase;
        let Some(active) = self.active.as_mut() else {
            return self.ignore(PhaseViolation::NoRound);
        };
        let round_id = active.round.id();
        let Some(target) = active.round.card_mut(card) else {
            return self.ignore(PhaseViolation::UnknownCard(card));
        };

        if !target.is_revealable() {
            let violation = if target.is_locked() {
                PhaseViolation::CardLocked(card)
            } else {
                PhaseViolation::AlreadyFaceUp(card)
            };
            return self.ignore(violation);
        }
        if !phase.accepts_reveal() {
            return self.ignore(PhaseViolation::NotAllowed { operation: Operation::Reveal, phase });
        }

        target.face_up = true;
        debug!("{round_id}: revealed {card}");

        if phase == Phase::Settled {
            self.phase = Phase::Revealed;
            renderer.phase_entered(round_id, Phase::Revealed, None);
        }
        if let Some(round) = self.round() {
            if let Some(revealed) = round.card(card) {
                renderer.place_card(round_id, &round.placement(revealed, &self.config.layout));
            }
        }
        Step::Revealed(card)
    }

    /// Alias of [`on_card_activated`](Self::on_card_activated).
    pub fn reveal<R: Renderer + ?Sized>(&mut self, card: CardIndex, renderer: &mut R) -> Step {
        self.on_card_activated(card, renderer)
    }

    /// Retire the current round and prepare a fresh one.
    ///
    /// Allowed from any phase. A pending continuation is cancelled first, so
    /// nothing scheduled for the old round can fire afterwards. The fresh
    /// round is not placed until it is dealt.
    pub fn restart<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Step {
        if let Some(cancelled) = self.schedule.cancel() {
            debug!("{}: cancelled pending {} continuation", cancelled.round, cancelled.phase);
        }

        if let Some(mut old) = self.active.take() {
            let id = old.round.id();
            old.round.send_offstage();
            self.phase = Phase::Restarting;
            renderer.phase_entered(id, Phase::Restarting, Phase::Restarting.animation(&self.config.timings));
            renderer.round_retired(id);
            info!("{id}: retired");
        }

        if let Err(err) = self.build_round() {
            error!("cannot build a round after restart: {err}");
        }
        // the new round stays at the deck until dealt
        let id = self.round().map_or(self.next_round, Round::id);
        self.phase = Phase::Idle;
        renderer.phase_entered(id, Phase::Idle, None);
        Step::Entered(Phase::Idle)
    }

    // === Scheduling ===

    /// The renderer finished animating a timed phase.
    ///
    /// Advances immediately if `continuation` is the pending one; a
    /// continuation from a retired round or an earlier phase is ignored.
    pub fn phase_complete<R: Renderer + ?Sized>(&mut self, continuation: Continuation, renderer: &mut R) -> Step {
        match self.schedule.claim(&continuation) {
            Some(claimed) => self.fire(claimed, self.schedule.now(), renderer),
            None => {
                warn!(
                    "{}: stale {} continuation ignored",
                    continuation.round, continuation.phase
                );
                self.ignore(PhaseViolation::StaleContinuation)
            }
        }
    }

    /// Move the virtual clock forward and fire every continuation that
    /// comes due, in order. Returns the phases entered.
    pub fn advance<R: Renderer + ?Sized>(&mut self, elapsed: Duration, renderer: &mut R) -> SmallVec<[Phase; 4]> {
        self.schedule.advance(elapsed);

        let mut entered = SmallVec::new();
        while let Some(due) = self.schedule.take_due() {
            // chained phases are timed from when the previous one was due,
            // so a large step does not stretch the sequence
            if let Step::Entered(phase) = self.fire(due, due.due, renderer) {
                entered.push(phase);
            }
        }
        entered
    }

    /// Run every pending phase to completion regardless of the clock.
    pub fn finish<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> SmallVec<[Phase; 4]> {
        let mut entered = SmallVec::new();
        while let Some(pending) = self.schedule.cancel() {
            if let Step::Entered(phase) = self.fire(pending, self.schedule.now(), renderer) {
                entered.push(phase);
            }
        }
        entered
    }

    /// Re-send the placement of every card of the active round.
    pub fn sync<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        if let Some(round) = self.round() {
            for placement in round.placements(&self.config.layout) {
                renderer.place_card(round.id(), &placement);
            }
        }
    }

    // === Internals ===

    /// Apply the transition out of a timed phase.
    fn fire<R: Renderer + ?Sized>(&mut self, continuation: Continuation, base: Duration, renderer: &mut R) -> Step {
        let Some(active) = self.active.as_mut() else {
            return self.ignore(PhaseViolation::StaleContinuation);
        };
        if continuation.round != active.round.id() || continuation.phase != self.phase {
            warn!("{}: continuation does not match {}", continuation.round, self.phase);
            return self.ignore(PhaseViolation::StaleContinuation);
        }

        let Some(next) = self.phase.successor() else {
            let phase = self.phase;
            return self.ignore(PhaseViolation::NotAllowed { operation: Operation::PhaseComplete, phase });
        };

        let n = active.round.len();
        match next {
            Phase::Gathering => {
                let ranks = active.priority_rng.permutation(n);
                active.round.assign_priorities(&ranks);
                active.round.gather();
            }
            Phase::Redistributing => {
                let slots = active.slot_rng.permutation(n);
                active.round.assign_slots(&slots);
            }
            Phase::Settled => {
                active.round.set_locked(false);
                active.round.mark_shuffled();
            }
            _ => {}
        }

        self.enter_from(next, base, renderer);
        if next == Phase::Settled {
            renderer.notify(Notice::Shuffled);
        }
        Step::Entered(next)
    }

    fn enter<R: Renderer + ?Sized>(&mut self, phase: Phase, renderer: &mut R) {
        let now = self.schedule.now();
        self.enter_from(phase, now, renderer);
    }

    /// Switch phase, schedule its continuation if timed, and place every card.
    fn enter_from<R: Renderer + ?Sized>(&mut self, phase: Phase, base: Duration, renderer: &mut R) {
        let Some(round) = self.active.as_ref().map(|a| &a.round) else {
            return;
        };
        let id = round.id();
        debug!("{id}: {} -> {phase}", self.phase);
        self.phase = phase;

        let animation = phase.animation(&self.config.timings);
        renderer.phase_entered(id, phase, animation);

        for placement in round.placements(&self.config.layout) {
            renderer.place_card(id, &placement);
        }

        if phase.is_timed() {
            self.schedule
                .schedule(id, phase, base, animation.unwrap_or(Duration::ZERO));
        }
    }

    /// Build a fresh round for the last requested count.
    fn build_round(&mut self) -> Result<(), ConfigurationError> {
        let id = self.next_round;
        let round_rng = self.rng.fork();
        let mut faces = round_rng.for_context("faces");
        let round = self.factory.build_round(id, self.requested, &mut faces)?;

        info!("{id}: built with {} cards", round.len());
        self.next_round = id.next();
        self.active = Some(ActiveRound {
            round,
            priority_rng: round_rng.for_context("priority"),
            slot_rng: round_rng.for_context("slots"),
        });
        Ok(())
    }

    fn ignore(&self, violation: PhaseViolation) -> Step {
        debug!("ignored in {}: {violation}", self.phase);
        Step::Ignored(violation)
    }
}
