//! Property tests for turn order.

use ng_core::ActorId;
use ng_turns::{TurnParticipant, TurnSequencer};
use proptest::prelude::*;

fn started(count: usize) -> (TurnSequencer, Vec<ActorId>) {
    let mut seq = TurnSequencer::new();
    let ids: Vec<ActorId> = (0..count).map(|_| ActorId::new()).collect();
    for id in &ids {
        seq.register(TurnParticipant::new(*id)).unwrap();
    }
    seq.start();
    (seq, ids)
}

proptest! {
    #[test]
    fn n_end_turns_roll_the_round(count in 1usize..12, rounds in 1u32..5) {
        let (mut seq, ids) = started(count);
        for round in 1..=rounds {
            prop_assert_eq!(seq.round_number(), round);
            for id in &ids {
                prop_assert_eq!(seq.active(), Some(*id));
                seq.end_turn(*id).unwrap();
            }
            prop_assert!(seq.participants().all(TurnParticipant::can_still_act_this_round));
        }
        prop_assert_eq!(seq.round_number(), rounds + 1);
    }

    #[test]
    fn every_participant_acts_once_per_round(
        count in 1usize..8,
        yields in prop::collection::vec(any::<bool>(), 0..40),
    ) {
        let (mut seq, ids) = started(count);
        let mut ended = Vec::new();
        for yield_turn in yields {
            if seq.round_number() != 1 {
                break;
            }
            let Some(active) = seq.active() else { break };
            if yield_turn {
                seq.start_turn_next(active).unwrap();
            } else {
                prop_assert!(!ended.contains(&active));
                ended.push(active);
                seq.end_turn(active).unwrap();
            }
        }
        if seq.round_number() > 1 {
            prop_assert_eq!(ended.len(), ids.len());
        }
    }

    #[test]
    fn out_of_turn_calls_never_move_the_turn(count in 2usize..8, pick in 1usize..8) {
        let (mut seq, ids) = started(count);
        let intruder = ids[pick % count];
        prop_assume!(Some(intruder) != seq.active());
        let before = (seq.active(), seq.round_number(), seq.log().len());
        prop_assert!(seq.end_turn(intruder).is_err());
        prop_assert!(seq.start_turn_next(intruder).is_err());
        prop_assert_eq!(before, (seq.active(), seq.round_number(), seq.log().len()));
    }
}
