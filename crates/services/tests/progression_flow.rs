use finlingo_core::emergency::{Choice, EmergencyFundGame};
use finlingo_core::model::{ChallengeId, LevelId, RewardOutcome, StarRating, TileSelection, Username};
use finlingo_core::time::fixed_now;
use services::{AppServices, Clock, LevelSession};

fn level(n: u8) -> LevelId {
    LevelId::new(n).unwrap()
}

fn required(session: &LevelSession) -> Vec<ChallengeId> {
    session.definition().required_challenges().cloned().collect()
}

#[tokio::test]
async fn guest_finishes_level_one_and_unlocks_level_two() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()));
    let guest = Username::guest();

    let home = app.home().visit(&guest).await.unwrap();
    assert_eq!(home.unlocked_level, LevelId::FIRST);
    let TileSelection::Open(picked) = app.home().select(&home, 1) else {
        panic!("level 1 should be open");
    };

    let levels = app.levels();
    let mut session = levels.start(&guest, picked).await.unwrap();
    let mut completion = None;
    for id in required(&session) {
        let report = levels.submit(&mut session, &id, true).await.unwrap();
        assert!(matches!(report.outcome, RewardOutcome::FirstTimeReward(_)));
        completion = report.completion.or(completion);
    }

    let completion = completion.expect("level completes on last challenge");
    assert_eq!(completion.earned_stars, StarRating::THREE);
    // 10 + 15 + 20 + 22 + 25 from challenges plus the 50 coin bonus.
    assert_eq!(completion.total_coins, 142);
    levels.return_home(session);

    let home = app.home().visit(&guest).await.unwrap();
    assert_eq!(home.unlocked_level, level(2));
    assert_eq!(home.notification.as_deref(), Some("Unlocked level 2!"));
    assert_eq!(app.home().select(&home, 2), TileSelection::Open(level(2)));

    let again = app.home().visit(&guest).await.unwrap();
    assert_eq!(again.unlocked_level, level(2));
    assert!(again.notification.is_none());

    let board = app.badges().board(&guest).await.unwrap();
    assert_eq!(board.earned(), 3);
}

#[tokio::test]
async fn replaying_a_level_pays_again_without_unlocking_twice() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()));
    let guest = Username::guest();
    let levels = app.levels();

    for _ in 0..2 {
        let mut session = levels.start(&guest, LevelId::FIRST).await.unwrap();
        for id in required(&session) {
            levels.submit(&mut session, &id, true).await.unwrap();
        }
        levels.return_home(session);
        app.home().visit(&guest).await.unwrap();
    }

    let record = app.progress().load(&guest).await.unwrap();
    assert_eq!(record.total_coins(), 284);
    assert_eq!(record.unlocked_level(), level(2));
    assert_eq!(record.last_completed_level(), None);
}

#[tokio::test]
async fn leaving_early_keeps_coins_but_not_completion() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()));
    let guest = Username::guest();
    let levels = app.levels();

    let mut session = levels.start(&guest, LevelId::FIRST).await.unwrap();
    let barter = ChallengeId::new("barter").unwrap();
    levels.submit(&mut session, &barter, true).await.unwrap();
    levels.submit(&mut session, &barter, true).await.unwrap();
    levels.return_home(session);

    let home = app.home().visit(&guest).await.unwrap();
    assert_eq!(home.unlocked_level, LevelId::FIRST);
    let record = app.progress().load(&guest).await.unwrap();
    assert_eq!(record.total_coins(), 10);
    assert!(!record.is_completed(LevelId::FIRST));
}

#[tokio::test]
async fn users_progress_independently_and_reset_is_scoped() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()));
    let mia = Username::new("mia").unwrap();
    let leo = Username::new("leo").unwrap();
    let levels = app.levels();

    let mut session = levels.start(&mia, LevelId::FIRST).await.unwrap();
    for id in required(&session) {
        levels.submit(&mut session, &id, true).await.unwrap();
    }
    app.home().visit(&mia).await.unwrap();
    app.goals().create(&mia, "Kite", 1_500).await.unwrap();

    assert_eq!(app.home().visit(&leo).await.unwrap().unlocked_level, LevelId::FIRST);

    app.reset_user(&mia).await.unwrap();
    let record = app.progress().load(&mia).await.unwrap();
    assert_eq!(record.unlocked_level(), LevelId::FIRST);
    assert_eq!(record.total_coins(), 0);
    assert_eq!(app.goals().get(&mia).await.unwrap(), None);
}

#[tokio::test]
async fn emergency_level_rates_by_ending_savings() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()));
    let guest = Username::guest();
    let levels = app.levels();

    let mut session = levels.start(&guest, level(5)).await.unwrap();
    let mut game = EmergencyFundGame::default();
    let mut completion = None;
    for choice in [Choice::UseSavings, Choice::Credit, Choice::UseSavings] {
        let decision = game.choose(choice).unwrap();
        let report = levels.record_decision(&mut session, &decision).await.unwrap();
        completion = report.completion.or(completion);
    }

    // 100 - 60, +20 income, credit, +20 income, -15.
    assert_eq!(game.savings(), 65);
    assert_eq!(completion.unwrap().earned_stars, StarRating::TWO);
}
