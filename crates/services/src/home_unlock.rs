use finlingo_core::model::unlock::{level_grid, select_slot, unlocked_notice, visit_home};
use finlingo_core::model::{LevelId, LevelTile, TileSelection, UnlockPhase, Username};
use tracing::{debug, info};

use crate::error::ProgressError;
use crate::progress_store::ProgressStore;

/// Everything the level-select screen shows after one visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeScreen {
    pub unlocked_level: LevelId,
    /// "Unlocked level N!" when this visit advanced the frontier.
    pub notification: Option<String>,
    pub tiles: Vec<LevelTile>,
    pub phases: Vec<UnlockPhase>,
}

/// Runs the unlock check each time the learner lands on the home screen.
#[derive(Clone)]
pub struct HomeUnlockController {
    progress: ProgressStore,
}

impl HomeUnlockController {
    #[must_use]
    pub fn new(progress: ProgressStore) -> Self {
        Self { progress }
    }

    /// Advance the frontier from the completion signal, clear the signal,
    /// and build the grid.
    ///
    /// The signal is cleared on every visit, even when it did not advance
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on backend failure.
    pub async fn visit(&self, user: &Username) -> Result<HomeScreen, ProgressError> {
        let mut record = self.progress.load(user).await?;
        let decision = visit_home(&mut record);
        self.progress.save(user, &record).await?;

        let notification = decision.newly_unlocked.map(unlocked_notice);
        if let Some(level) = decision.newly_unlocked {
            info!(%user, %level, "level unlocked");
        } else {
            debug!(%user, unlocked = %decision.unlocked_level, "home visit");
        }

        Ok(HomeScreen {
            unlocked_level: record.unlocked_level(),
            notification,
            tiles: level_grid(&record),
            phases: decision.trace(),
        })
    }

    /// Resolve a tap on grid slot `slot` (one-based).
    #[must_use]
    pub fn select(&self, screen: &HomeScreen, slot: u32) -> TileSelection {
        select_slot(screen.unlocked_level, slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use finlingo_core::model::{ProgressRecord, TileState};
    use storage::repository::{InMemoryStore, KeyValueStore};

    fn level(n: u8) -> LevelId {
        LevelId::new(n).unwrap()
    }

    fn controller() -> (InMemoryStore, ProgressStore, HomeUnlockController) {
        let kv = InMemoryStore::new();
        let progress = ProgressStore::new(Arc::new(kv.clone()));
        (kv, progress.clone(), HomeUnlockController::new(progress))
    }

    #[tokio::test]
    async fn fresh_user_sees_level_one_only() {
        let (_, _, home) = controller();
        let screen = home.visit(&Username::guest()).await.unwrap();

        assert_eq!(screen.unlocked_level, LevelId::FIRST);
        assert_eq!(screen.notification, None);
        assert_eq!(screen.tiles.len(), 15);
        assert!(screen.tiles[0].is_selectable());
        assert_eq!(screen.tiles[1].state, TileState::Locked);
        assert_eq!(screen.tiles[5].state, TileState::ComingSoon);
        assert_eq!(
            screen.phases,
            vec![UnlockPhase::Start, UnlockPhase::Check, UnlockPhase::Render]
        );
    }

    #[tokio::test]
    async fn completion_signal_unlocks_next_once() {
        let (_, progress, home) = controller();
        let guest = Username::guest();
        progress.mark_last_completed(&guest, level(1)).await.unwrap();

        let screen = home.visit(&guest).await.unwrap();
        assert_eq!(screen.unlocked_level, level(2));
        assert_eq!(screen.notification.as_deref(), Some("Unlocked level 2!"));
        assert!(screen.phases.contains(&UnlockPhase::Advance));

        let again = home.visit(&guest).await.unwrap();
        assert_eq!(again.unlocked_level, level(2));
        assert_eq!(again.notification, None);
    }

    #[tokio::test]
    async fn replaying_an_old_level_clears_without_advancing() {
        let (kv, progress, home) = controller();
        let guest = Username::guest();
        let mut record = ProgressRecord::default();
        record.raise_unlocked_level(level(4));
        record.mark_last_completed(level(2));
        progress.save(&guest, &record).await.unwrap();

        let screen = home.visit(&guest).await.unwrap();
        assert_eq!(screen.unlocked_level, level(4));
        assert_eq!(screen.notification, None);
        assert!(screen.phases.contains(&UnlockPhase::Clear));
        assert_eq!(
            kv.get("progress:guest.lastCompletedLevel").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn last_level_never_unlocks_past_five() {
        let (_, progress, home) = controller();
        let guest = Username::guest();
        let mut record = ProgressRecord::default();
        record.raise_unlocked_level(level(5));
        record.mark_last_completed(level(5));
        progress.save(&guest, &record).await.unwrap();

        let screen = home.visit(&guest).await.unwrap();
        assert_eq!(screen.unlocked_level, LevelId::LAST);
        assert_eq!(screen.notification, None);
    }

    #[tokio::test]
    async fn invalid_signal_is_discarded() {
        let (kv, _, home) = controller();
        kv.put("progress:guest.lastCompletedLevel", "0").await.unwrap();

        let screen = home.visit(&Username::guest()).await.unwrap();
        assert_eq!(screen.unlocked_level, LevelId::FIRST);
        assert_eq!(
            kv.get("progress:guest.lastCompletedLevel").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn select_respects_frontier() {
        let (_, progress, home) = controller();
        let guest = Username::guest();
        progress.mark_last_completed(&guest, level(1)).await.unwrap();
        let screen = home.visit(&guest).await.unwrap();

        assert_eq!(home.select(&screen, 2), TileSelection::Open(level(2)));
        assert_eq!(
            home.select(&screen, 3),
            TileSelection::Notice("Open level 2 to unlock this level.".to_owned())
        );
        assert_eq!(
            home.select(&screen, 9),
            TileSelection::Notice("These levels are coming soon".to_owned())
        );
    }
}
