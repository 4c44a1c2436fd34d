#![forbid(unsafe_code)]

pub mod app_services;
pub mod badge_service;
pub mod error;
pub mod goal_jar_service;
pub mod home_unlock;
pub mod level_session;
pub mod prefs_service;
pub mod progress_store;

pub use finlingo_core::Clock;

pub use app_services::AppServices;
pub use badge_service::{BadgeBoard, BadgeService};
pub use error::{
    AppServicesError, GoalJarError, LevelSessionError, PrefsServiceError, ProgressError,
};
pub use goal_jar_service::{DepositReport, GoalJarService};
pub use home_unlock::{HomeScreen, HomeUnlockController};
pub use level_session::{CompletionReport, LevelSession, LevelSessionService, SubmitReport};
pub use prefs_service::PrefsService;
pub use progress_store::ProgressStore;
