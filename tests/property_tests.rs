//! Property tests for deck building and the sequencer invariants.

use std::time::Duration;

use proptest::prelude::*;
use rustc_hash::FxHashSet;

use card_shuffle::{
    CardIndex, CountRange, DeckFactory, EngineConfig, Phase, RenderLog, RoundId, Sequencer,
    ShuffleRng,
};

/// Something a player or the clock can do.
#[derive(Clone, Debug)]
enum Input {
    Deal(Option<i64>),
    Shuffle,
    Click(u8),
    Restart,
    Tick(u64),
    Complete,
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        prop::option::of(-2i64..9).prop_map(Input::Deal),
        Just(Input::Shuffle),
        (0u8..6).prop_map(Input::Click),
        Just(Input::Restart),
        (0u64..2000).prop_map(Input::Tick),
        Just(Input::Complete),
    ]
}

proptest! {
    /// Every supported count yields that many cards with distinct faces.
    #[test]
    fn prop_build_round_distinct_faces(requested in prop::option::of(-10i64..20), seed: u64) {
        let factory = DeckFactory::new(CountRange::new(3, 5), ["A", "K", "Q", "J", "10"]);
        let mut rng = ShuffleRng::new(seed);
        let round = factory.build_round(RoundId::FIRST, requested, &mut rng).unwrap();

        let expected = CountRange::new(3, 5).clamp(requested);
        prop_assert_eq!(round.len(), expected);

        let faces: FxHashSet<&str> = round.face_values().collect();
        prop_assert_eq!(faces.len(), expected);
        prop_assert!(round.slots_are_permutation());
    }

    /// Permutations are complete for any size.
    #[test]
    fn prop_permutation_complete(n in 0usize..32, seed: u64) {
        let mut perm = ShuffleRng::new(seed).permutation(n).into_vec();
        perm.sort_unstable();
        prop_assert_eq!(perm, (0..n).collect::<Vec<_>>());
    }

    /// After a finished shuffle, slots cover 0..N and priorities cover 1..=N.
    #[test]
    fn prop_settled_round_is_full_permutation(count in 3i64..=5, seed: u64) {
        let mut seq = Sequencer::new(EngineConfig::new().with_seed(seed)).unwrap();
        let mut log = RenderLog::new();
        seq.deal(Some(count), &mut log);
        seq.shuffle(&mut log);
        seq.advance(Duration::from_secs(10), &mut log);

        prop_assert_eq!(seq.phase(), Phase::Settled);
        let round = seq.round().unwrap();
        prop_assert!(round.slots_are_permutation());
        prop_assert!(round.priorities_are_permutation());
    }

    /// Whatever happens, the dealt round's slots stay a permutation, locked
    /// cards are never revealed, and nothing is placed for retired rounds
    /// or while idle.
    #[test]
    fn prop_invariants_hold_under_any_input(
        seed: u64,
        inputs in prop::collection::vec(input(), 1..40),
    ) {
        let mut seq = Sequencer::new(EngineConfig::new().with_seed(seed)).unwrap();
        let mut log = RenderLog::new();
        let mut retired = FxHashSet::default();

        for step in inputs {
            let before = seq.round().cloned();
            log.clear();

            match step {
                Input::Deal(n) => { seq.deal(n, &mut log); }
                Input::Shuffle => { seq.shuffle(&mut log); }
                Input::Click(card) => {
                    let card = CardIndex(card);
                    let was_locked = before
                        .as_ref()
                        .and_then(|r| r.card(card))
                        .map_or(true, |c| c.is_locked());
                    let result = seq.on_card_activated(card, &mut log);
                    if was_locked {
                        prop_assert!(!result.is_applied());
                        prop_assert_eq!(seq.round(), before.as_ref());
                    }
                }
                Input::Restart => {
                    if let Some(r) = &before {
                        retired.insert(r.id());
                    }
                    seq.restart(&mut log);
                }
                Input::Tick(ms) => { seq.advance(Duration::from_millis(ms), &mut log); }
                Input::Complete => {
                    if let Some(pending) = seq.pending() {
                        seq.phase_complete(pending, &mut log);
                    }
                }
            }

            let round = seq.round().unwrap();
            prop_assert!(round.slots_are_permutation());
            prop_assert!(!retired.contains(&round.id()));
            for (id, _) in log.placements() {
                prop_assert!(!retired.contains(&id));
            }
            if seq.phase() == Phase::Idle {
                prop_assert_eq!(log.placements().count(), 0);
            }
            if let Some(pending) = seq.pending() {
                prop_assert_eq!(pending.round, round.id());
                prop_assert!(pending.phase.is_timed());
                prop_assert_eq!(pending.phase, seq.phase());
            }
            let shuffling = matches!(
                seq.phase(),
                Phase::FlippingDown | Phase::Gathering | Phase::Redistributing
            );
            if shuffling {
                prop_assert!(round.cards().iter().all(|c| c.is_locked() && !c.is_face_up()));
            }
            if seq.phase().accepts_reveal() {
                prop_assert!(round.priorities_are_permutation());
            }
        }
    }
}
