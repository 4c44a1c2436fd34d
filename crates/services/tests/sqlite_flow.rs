use finlingo_core::model::{ChallengeId, LevelId, Theme, Username};
use finlingo_core::time::fixed_now;
use services::{AppServices, Clock};

#[tokio::test]
async fn progress_survives_reopening_the_database() {
    let db_url = "sqlite:file:memdb_services_flow?mode=memory&cache=shared";
    let clock = Clock::fixed(fixed_now());
    let guest = Username::guest();

    let first = AppServices::new_sqlite(db_url, clock).await.unwrap();
    let levels = first.levels();
    let mut session = levels.start(&guest, LevelId::FIRST).await.unwrap();
    let ids: Vec<ChallengeId> = session.definition().required_challenges().cloned().collect();
    for id in &ids {
        levels.submit(&mut session, id, true).await.unwrap();
    }
    levels.return_home(session);
    first.prefs().set_theme(&guest, Theme::Enchanted).await.unwrap();

    // Second handle on the same shared-cache database, like a fresh launch.
    let second = AppServices::new_sqlite(db_url, clock).await.unwrap();
    let home = second.home().visit(&guest).await.unwrap();
    assert_eq!(home.unlocked_level, LevelId::new(2).unwrap());
    assert_eq!(home.notification.as_deref(), Some("Unlocked level 2!"));
    assert_eq!(second.prefs().load(&guest).await.unwrap().theme, Theme::Enchanted);
    assert_eq!(
        second.progress().load(&guest).await.unwrap().total_coins(),
        142
    );
}
