//! Sequencer integration tests.
//!
//! These drive whole rounds through the public API with a recording
//! renderer and check the ordering and locking guarantees.

use std::time::Duration;

use card_shuffle::{
    CardIndex, EngineConfig, Notice, Phase, PhaseTimings, PhaseViolation, Position, RenderEvent,
    RenderLog, Round, Sequencer, Slot, Step,
};

fn four_card_config(seed: u64) -> EngineConfig {
    EngineConfig::new()
        .with_count_range(3, 4)
        .with_pool(["A", "K", "Q", "J"])
        .with_seed(seed)
}

fn snapshot(seq: &Sequencer) -> Round {
    seq.round().expect("round should exist").clone()
}

// =============================================================================
// End-to-end
// =============================================================================

/// Deal four cards, shuffle, and reveal the card at slot 2.
#[test]
fn test_four_card_round() {
    let mut seq = Sequencer::new(four_card_config(42)).unwrap();
    let mut log = RenderLog::new();

    assert_eq!(seq.deal(Some(4), &mut log), Step::Entered(Phase::Dealt));
    let round = snapshot(&seq);
    assert_eq!(round.len(), 4);

    let mut faces: Vec<_> = round.face_values().collect();
    faces.sort_unstable();
    assert_eq!(faces, vec!["A", "J", "K", "Q"]);

    // placed at slots 0..4, face up, locked
    for card in round.cards() {
        assert_eq!(card.position(), Position::Slot(card.slot()));
        assert_eq!(card.slot().index(), card.index().index());
        assert!(card.is_face_up());
        assert!(card.is_locked());
    }
    assert_eq!(log.placements().count(), 4);

    assert_eq!(seq.shuffle(&mut log), Step::Entered(Phase::FlippingDown));
    let entered = seq.advance(Duration::from_secs(5), &mut log);
    assert_eq!(
        entered.as_slice(),
        &[Phase::Gathering, Phase::Redistributing, Phase::Settled]
    );
    assert_eq!(
        log.phases(),
        vec![
            Phase::Dealt,
            Phase::FlippingDown,
            Phase::Gathering,
            Phase::Redistributing,
            Phase::Settled,
        ]
    );

    let settled = snapshot(&seq);
    assert!(settled.slots_are_permutation());
    assert!(settled.priorities_are_permutation());
    assert!(settled.cards().iter().all(|c| !c.is_locked() && !c.is_face_up()));

    let target = settled.card_at_slot(Slot(2)).unwrap().index();
    assert_eq!(seq.on_card_activated(target, &mut log), Step::Revealed(target));

    let revealed = snapshot(&seq);
    for card in revealed.cards() {
        assert_eq!(card.is_face_up(), card.index() == target);
        assert_eq!(card.slot(), settled.card(card.index()).unwrap().slot());
    }
    assert_eq!(seq.phase(), Phase::Revealed);
}

/// Face values travel with their cards through the whole shuffle.
#[test]
fn test_shuffle_never_changes_face_values() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(11)).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(5), &mut log);
    let before: Vec<String> = snapshot(&seq).face_values().map(str::to_string).collect();

    seq.shuffle(&mut log);
    seq.finish(&mut log);

    let after: Vec<String> = snapshot(&seq).face_values().map(str::to_string).collect();
    assert_eq!(before, after);
}

// =============================================================================
// Shuffle guard
// =============================================================================

/// A second shuffle in the same round only notifies.
#[test]
fn test_second_shuffle_only_notifies() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(1)).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(3), &mut log);

    assert_eq!(seq.shuffle(&mut log), Step::Entered(Phase::FlippingDown));
    let pending = seq.pending();
    let round = snapshot(&seq);
    log.clear();

    assert_eq!(
        seq.shuffle(&mut log),
        Step::Ignored(PhaseViolation::AlreadyShuffled)
    );
    assert_eq!(log.events(), &[RenderEvent::Notified(Notice::AlreadyShuffled)]);
    assert_eq!(snapshot(&seq), round);
    assert_eq!(seq.pending(), pending);
    assert_eq!(seq.phase(), Phase::FlippingDown);
}

/// Shuffle requested after the sequence finished is refused too.
#[test]
fn test_shuffle_after_settled_refused() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(2)).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(3), &mut log);
    seq.shuffle(&mut log);
    seq.finish(&mut log);
    log.clear();

    let before = snapshot(&seq);
    assert!(!seq.shuffle(&mut log).is_applied());
    assert_eq!(log.notices(), vec![Notice::AlreadyShuffled]);
    assert_eq!(snapshot(&seq), before);
    assert!(seq.pending().is_none());
}

/// Exactly one full sequence runs even if shuffle is spammed throughout.
#[test]
fn test_spammed_shuffle_runs_one_sequence() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(3)).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(4), &mut log);

    for _ in 0..10 {
        seq.shuffle(&mut log);
        seq.advance(Duration::from_millis(400), &mut log);
    }

    let flips = log.phases().iter().filter(|p| **p == Phase::FlippingDown).count();
    let settles = log.phases().iter().filter(|p| **p == Phase::Settled).count();
    assert_eq!(flips, 1);
    assert_eq!(settles, 1);
    assert_eq!(seq.phase(), Phase::Settled);
}

// =============================================================================
// Click lock
// =============================================================================

/// Clicks on locked cards change nothing, in every phase before Settled.
#[test]
fn test_locked_clicks_are_noops() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(4)).unwrap();
    let mut log = RenderLog::new();

    let click_all = |seq: &mut Sequencer, log: &mut RenderLog| {
        let before = snapshot(seq);
        let phase = seq.phase();
        log.clear();
        for card in CardIndex::all(before.len()) {
            assert_eq!(
                seq.on_card_activated(card, log),
                Step::Ignored(PhaseViolation::CardLocked(card)),
                "card {card} in {phase}"
            );
        }
        assert_eq!(snapshot(seq), before);
        assert_eq!(seq.phase(), phase);
        assert!(log.events().is_empty());
    };

    click_all(&mut seq, &mut log);

    seq.deal(Some(5), &mut log);
    click_all(&mut seq, &mut log);

    seq.shuffle(&mut log);
    for _ in 0..3 {
        click_all(&mut seq, &mut log);
        let pending = seq.pending().unwrap();
        seq.phase_complete(pending, &mut log);
    }
    assert_eq!(seq.phase(), Phase::Settled);
}

/// Every card can be revealed independently once settled.
#[test]
fn test_every_card_reveals_independently() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(5)).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(5), &mut log);
    seq.shuffle(&mut log);
    seq.finish(&mut log);

    for card in CardIndex::all(5) {
        assert_eq!(seq.on_card_activated(card, &mut log), Step::Revealed(card));
    }
    assert!(snapshot(&seq).cards().iter().all(|c| c.is_face_up()));
}

// =============================================================================
// Restart and cancellation
// =============================================================================

/// Restart during Gathering cancels the pending step; nothing is placed for
/// the old round afterwards, however far the clock moves.
#[test]
fn test_restart_during_gathering_cancels() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(6)).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(4), &mut log);
    seq.shuffle(&mut log);
    seq.advance(Duration::from_millis(1100), &mut log);
    assert_eq!(seq.phase(), Phase::Gathering);

    let old_round = snapshot(&seq).id();
    let stale = seq.pending().unwrap();
    assert_eq!(stale.round, old_round);
    log.clear();

    assert_eq!(seq.restart(&mut log), Step::Entered(Phase::Idle));
    assert!(seq.pending().is_none());
    assert_ne!(snapshot(&seq).id(), old_round);
    // the fresh round waits at the deck without being placed, so no card
    // index is reused before the next deal
    assert_eq!(log.placements().count(), 0);
    assert_eq!(log.phases(), vec![Phase::Restarting, Phase::Idle]);
    log.clear();

    seq.advance(Duration::from_secs(60), &mut log);
    assert_eq!(
        seq.phase_complete(stale, &mut log),
        Step::Ignored(PhaseViolation::StaleContinuation)
    );
    assert!(log.events().is_empty());
    assert_eq!(seq.phase(), Phase::Idle);
}

/// A continuation from a retired round cannot fire against a new round
/// that happens to be in the same phase.
#[test]
fn test_stale_continuation_against_new_round() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(7)).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(3), &mut log);
    seq.shuffle(&mut log);
    let stale = seq.pending().unwrap();

    seq.restart(&mut log);
    seq.deal(Some(3), &mut log);
    seq.shuffle(&mut log);
    let fresh = seq.pending().unwrap();
    assert_eq!(fresh.phase, stale.phase);
    assert_ne!(fresh.round, stale.round);

    assert!(!seq.phase_complete(stale, &mut log).is_applied());
    assert_eq!(seq.phase(), Phase::FlippingDown);
    assert_eq!(seq.phase_complete(fresh, &mut log), Step::Entered(Phase::Gathering));
}

/// Restart retires the old round and prepares an undealt one.
#[test]
fn test_restart_prepares_fresh_round() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(8)).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(4), &mut log);
    seq.shuffle(&mut log);
    seq.finish(&mut log);
    seq.on_card_activated(CardIndex(0), &mut log);
    let old = snapshot(&seq).id();
    log.clear();

    seq.restart(&mut log);

    assert_eq!(
        log.phases(),
        vec![Phase::Restarting, Phase::Idle]
    );
    assert!(log.events().contains(&RenderEvent::Retired(old)));

    let fresh = snapshot(&seq);
    assert_eq!(fresh.len(), 4);
    assert!(!fresh.has_shuffled_once());
    assert_eq!(fresh.priority_permutation(), None);
    assert!(fresh
        .cards()
        .iter()
        .all(|c| c.position() == Position::Deck && !c.is_face_up() && c.is_locked()));

    assert_eq!(log.placements().count(), 0);

    // the new round is a full round again, placed from the deal on
    assert_eq!(seq.deal(Some(4), &mut log), Step::Entered(Phase::Dealt));
    assert_eq!(log.placements().count(), 4);
    assert!(log.placements().all(|(round, _)| round == fresh.id()));
    assert_eq!(seq.shuffle(&mut log), Step::Entered(Phase::FlippingDown));
}

// =============================================================================
// Timing
// =============================================================================

/// Phases advance only once their settle delay has fully elapsed.
#[test]
fn test_phase_durations() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(9)).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(3), &mut log);
    seq.shuffle(&mut log);

    let ms = Duration::from_millis;
    assert!(seq.advance(ms(1099), &mut log).is_empty());
    assert_eq!(seq.advance(ms(1), &mut log).as_slice(), &[Phase::Gathering]);
    assert!(seq.advance(ms(1499), &mut log).is_empty());
    assert_eq!(seq.advance(ms(1), &mut log).as_slice(), &[Phase::Redistributing]);
    assert_eq!(seq.advance(ms(1000), &mut log).as_slice(), &[Phase::Settled]);
    assert_eq!(seq.now(), ms(3600));
}

/// Early completion from the renderer re-bases the next delay on "now".
#[test]
fn test_renderer_driven_timing() {
    let mut seq = Sequencer::new(EngineConfig::new().with_seed(10)).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(3), &mut log);
    seq.shuffle(&mut log);

    seq.advance(Duration::from_millis(300), &mut log);
    let pending = seq.pending().unwrap();
    seq.phase_complete(pending, &mut log);

    let gathering = seq.pending().unwrap();
    assert_eq!(gathering.phase, Phase::Gathering);
    assert_eq!(gathering.due, Duration::from_millis(300 + 1500));
}

/// Instant timings settle on the first clock tick.
#[test]
fn test_instant_timings() {
    let config = EngineConfig::new()
        .with_seed(12)
        .with_timings(PhaseTimings::instant());
    let mut seq = Sequencer::new(config).unwrap();
    let mut log = RenderLog::new();
    seq.deal(Some(3), &mut log);
    seq.shuffle(&mut log);

    seq.advance(Duration::ZERO, &mut log);
    assert_eq!(seq.phase(), Phase::Settled);
}

// =============================================================================
// Configuration
// =============================================================================

/// The configuration is checked up front.
#[test]
fn test_bad_config_rejected() {
    let config = EngineConfig::new().with_pool(["A", "K"]);
    assert!(Sequencer::new(config).is_err());
}

/// Out-of-range requests are clamped, not rejected.
#[test]
fn test_deal_clamps_count() {
    let mut log = RenderLog::new();

    let mut seq = Sequencer::new(EngineConfig::new().with_seed(13)).unwrap();
    seq.deal(Some(12), &mut log);
    assert_eq!(snapshot(&seq).len(), 5);

    let mut seq = Sequencer::new(EngineConfig::new().with_seed(13)).unwrap();
    seq.deal(card_shuffle::parse_count_input("abc"), &mut log);
    assert_eq!(snapshot(&seq).len(), 3);
}

/// Same seed, same session.
#[test]
fn test_seeded_sessions_repeat() {
    let run = || {
        let mut seq = Sequencer::new(EngineConfig::new().with_seed(77)).unwrap();
        let mut log = RenderLog::new();
        seq.deal(Some(5), &mut log);
        seq.shuffle(&mut log);
        seq.finish(&mut log);
        log.drain()
    };
    assert_eq!(run(), run());
}
