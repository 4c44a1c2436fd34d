//! Shared error types for the services crate.

use thiserror::Error;

use finlingo_core::lessons::AnswerError;
use finlingo_core::model::{ChallengeId, GoalError, LevelId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressStore`.
///
/// Malformed stored values are never an error; they read back as defaults.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LevelSessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LevelSessionError {
    #[error("level {0} is not configured")]
    UnknownLevel(LevelId),
    #[error("challenge {challenge} does not belong to level {level}")]
    UnknownChallenge { level: LevelId, challenge: ChallengeId },
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted by `PrefsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PrefsServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `GoalJarService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GoalJarError {
    #[error("no savings goal has been created yet")]
    NoGoal,
    #[error(transparent)]
    Goal(#[from] GoalError),
    #[error("could not encode goal: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AppServices`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Prefs(#[from] PrefsServiceError),
    #[error(transparent)]
    GoalJar(#[from] GoalJarError),
}
