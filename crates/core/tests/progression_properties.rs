//! Property tests for the progression rules shared by every level.

use finlingo_core::model::unlock::{plan_unlock, visit_home};
use finlingo_core::model::{
    ChallengeId, LevelCatalog, LevelCompletion, LevelId, LevelSignals, ProgressRecord,
    RewardLedger, RewardOutcome, StarRating,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Event {
    Complete(u8),
    VisitHome,
}

fn arb_level() -> impl Strategy<Value = LevelId> {
    (1u8..=5).prop_map(|n| LevelId::new(n).unwrap())
}

fn arb_events(max: usize) -> impl Strategy<Value = Vec<Event>> {
    proptest::collection::vec(
        prop_oneof![(1u8..=5).prop_map(Event::Complete), Just(Event::VisitHome)],
        1..=max,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// The unlock frontier never moves backwards and never passes level 5.
    #[test]
    fn unlock_is_monotonic(events in arb_events(40)) {
        let mut record = ProgressRecord::default();
        let mut previous = record.unlocked_level();
        for event in events {
            match event {
                Event::Complete(n) => record.mark_last_completed(LevelId::new(n).unwrap()),
                Event::VisitHome => {
                    visit_home(&mut record);
                }
            }
            prop_assert!(record.unlocked_level() >= previous);
            prop_assert!(record.unlocked_level() <= LevelId::LAST);
            previous = record.unlocked_level();
        }
    }

    /// One pass advances to at most `completed + 1`, whatever was forged.
    #[test]
    fn single_step_advance(unlocked in arb_level(), forged in arb_level()) {
        let decision = plan_unlock(unlocked, Some(forged));
        prop_assert!(decision.unlocked_level >= unlocked);
        prop_assert!(decision.unlocked_level <= unlocked.max(forged.next()));
        prop_assert!(decision.consumed_signal);
    }

    /// A second visit without new signal is a no-op.
    #[test]
    fn signal_is_consumed(unlocked in arb_level(), completed in arb_level()) {
        let mut record = ProgressRecord::default();
        record.raise_unlocked_level(unlocked);
        record.mark_last_completed(completed);

        visit_home(&mut record);
        prop_assert_eq!(record.last_completed_level(), None);
        let after_first = record.unlocked_level();

        let again = visit_home(&mut record);
        prop_assert_eq!(again.newly_unlocked, None);
        prop_assert_eq!(record.unlocked_level(), after_first);
    }

    /// Paying out is idempotent per challenge, however often it is answered.
    #[test]
    fn reward_paid_once(answers in proptest::collection::vec(any::<bool>(), 1..20)) {
        let barter = ChallengeId::new("barter").unwrap();
        let mut ledger = RewardLedger::new([(barter.clone(), 10)]);
        let mut credited = 0u32;
        for correct in &answers {
            credited += ledger.evaluate(&barter, *correct).unwrap().coins();
        }
        let expected = if answers.iter().any(|c| *c) { 10 } else { 0 };
        prop_assert_eq!(credited, expected);
    }

    /// Replaying a level never lowers the stored rating.
    #[test]
    fn stars_never_drop(savings in proptest::collection::vec(-50i64..200, 1..10)) {
        let catalog = LevelCatalog::standard();
        let level = catalog.get(LevelId::LAST).unwrap();
        let mut record = ProgressRecord::default();
        let mut best = StarRating::NONE;
        for ending in savings {
            let completion = LevelCompletion::compute(
                level,
                &LevelSignals { ending_savings: Some(ending), ..LevelSignals::default() },
            );
            let stored = completion.apply_to(&mut record);
            prop_assert!(stored >= best);
            best = stored;
        }
    }
}

#[test]
fn second_correct_answer_is_acknowledged() {
    let barter = ChallengeId::new("barter").unwrap();
    let mut ledger = RewardLedger::new([(barter.clone(), 10)]);
    assert_eq!(
        ledger.evaluate(&barter, true),
        Ok(RewardOutcome::FirstTimeReward(10))
    );
    assert_eq!(
        ledger.evaluate(&barter, true),
        Ok(RewardOutcome::AlreadyRewarded)
    );
}
