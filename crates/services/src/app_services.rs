use std::sync::Arc;

use finlingo_core::model::{LevelCatalog, Username};
use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::badge_service::BadgeService;
use crate::error::AppServicesError;
use crate::goal_jar_service::GoalJarService;
use crate::home_unlock::HomeUnlockController;
use crate::level_session::LevelSessionService;
use crate::prefs_service::PrefsService;
use crate::progress_store::ProgressStore;

/// Assembles app-facing services over one shared store.
#[derive(Clone)]
pub struct AppServices {
    progress: ProgressStore,
    levels: Arc<LevelSessionService>,
    home: Arc<HomeUnlockController>,
    prefs: Arc<PrefsService>,
    goals: Arc<GoalJarService>,
    badges: Arc<BadgeService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        info!(db_url, "storage ready");
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over a throwaway in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let progress = ProgressStore::new(Arc::clone(&storage.kv));
        let catalog = Arc::new(LevelCatalog::standard());

        Self {
            levels: Arc::new(LevelSessionService::new(catalog, progress.clone())),
            home: Arc::new(HomeUnlockController::new(progress.clone())),
            prefs: Arc::new(PrefsService::new(Arc::clone(&storage.kv))),
            goals: Arc::new(GoalJarService::new(clock, Arc::clone(&storage.kv))),
            badges: Arc::new(BadgeService::new(progress.clone())),
            progress,
        }
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    #[must_use]
    pub fn levels(&self) -> Arc<LevelSessionService> {
        Arc::clone(&self.levels)
    }

    #[must_use]
    pub fn home(&self) -> Arc<HomeUnlockController> {
        Arc::clone(&self.home)
    }

    #[must_use]
    pub fn prefs(&self) -> Arc<PrefsService> {
        Arc::clone(&self.prefs)
    }

    #[must_use]
    pub fn goals(&self) -> Arc<GoalJarService> {
        Arc::clone(&self.goals)
    }

    #[must_use]
    pub fn badges(&self) -> Arc<BadgeService> {
        Arc::clone(&self.badges)
    }

    /// Wipe progress, prefs and the savings goal for one user.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` on backend failure.
    pub async fn reset_user(&self, user: &Username) -> Result<(), AppServicesError> {
        self.progress.reset(user).await?;
        self.prefs.reset(user).await?;
        self.goals.reset(user).await?;
        info!(%user, "user reset");
        Ok(())
    }
}
