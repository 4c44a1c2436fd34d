use finlingo_core::model::{BadgeStatus, ProgressRecord, Username, evaluate_badges};

use crate::error::ProgressError;
use crate::progress_store::ProgressStore;

/// Badge wall derived from stored progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeBoard {
    pub badges: Vec<BadgeStatus>,
    pub total_coins: u64,
    pub completed_levels: usize,
}

impl BadgeBoard {
    #[must_use]
    pub fn from_record(record: &ProgressRecord) -> Self {
        Self {
            badges: evaluate_badges(record),
            total_coins: record.total_coins(),
            completed_levels: record.completed_levels(),
        }
    }

    #[must_use]
    pub fn earned(&self) -> usize {
        self.badges.iter().filter(|status| status.earned).count()
    }

    pub fn level_badges(&self) -> impl Iterator<Item = &BadgeStatus> {
        self.badges.iter().filter(|status| !status.badge.special)
    }

    pub fn special_badges(&self) -> impl Iterator<Item = &BadgeStatus> {
        self.badges.iter().filter(|status| status.badge.special)
    }
}

#[derive(Clone)]
pub struct BadgeService {
    progress: ProgressStore,
}

impl BadgeService {
    #[must_use]
    pub fn new(progress: ProgressStore) -> Self {
        Self { progress }
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on backend failure.
    pub async fn board(&self, user: &Username) -> Result<BadgeBoard, ProgressError> {
        let record = self.progress.load(user).await?;
        Ok(BadgeBoard::from_record(&record))
    }
}
