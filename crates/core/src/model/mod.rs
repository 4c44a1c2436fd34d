mod badge;
mod completion;
mod goal;
mod ids;
mod level;
mod prefs;
mod progress;
mod reward;
pub mod unlock;

pub use badge::{Badge, BadgeRule, BadgeStatus, COIN_COLLECTOR_THRESHOLD, all_badges, evaluate_badges};
pub use completion::{CompletionGuard, LevelCompletion, is_level_complete};
pub use goal::{GoalError, SavingsGoal, format_cents, parse_cents};
pub use ids::{
    ChallengeId, ChallengeIdError, GRID_SLOTS, LevelId, LevelIdError, PLAYABLE_LEVELS, SessionId,
    Username, UsernameError,
};
pub use level::{ChallengeSpec, LevelCatalog, LevelDefinition, LevelSignals, StarRule};
pub use prefs::{Theme, UnknownTheme, UserPrefs};
pub use progress::{ProgressRecord, StarRating};
pub use reward::{RewardError, RewardLedger, RewardOutcome};
pub use unlock::{LevelTile, TileSelection, TileState, UnlockDecision, UnlockPhase};
