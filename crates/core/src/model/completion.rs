use std::collections::BTreeSet;

use crate::model::ids::{ChallengeId, LevelId};
use crate::model::level::{LevelDefinition, LevelSignals};
use crate::model::progress::{ProgressRecord, StarRating};

/// A level is done once every required challenge has been completed.
///
/// An empty requirement list is trivially complete.
pub fn is_level_complete<'a>(
    completed: &BTreeSet<ChallengeId>,
    required: impl IntoIterator<Item = &'a ChallengeId>,
) -> bool {
    required.into_iter().all(|id| completed.contains(id))
}

/// What a level completion earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCompletion {
    pub level: LevelId,
    pub earned_stars: StarRating,
    pub bonus_coins: u32,
}

impl LevelCompletion {
    #[must_use]
    pub fn compute(definition: &LevelDefinition, signals: &LevelSignals) -> Self {
        Self {
            level: definition.id(),
            earned_stars: definition.star_rating(signals),
            bonus_coins: definition.completion_bonus(),
        }
    }

    /// Apply the completion side effects to a progress record.
    ///
    /// Returns the rating now stored, which may be higher than `earned_stars`
    /// if an earlier attempt did better.
    pub fn apply_to(&self, record: &mut ProgressRecord) -> StarRating {
        record.credit_coins(u64::from(self.bonus_coins));
        let best = record.record_stars(self.level, self.earned_stars);
        record.mark_last_completed(self.level);
        best
    }
}

/// Fires the completion side effects at most once per level session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionGuard {
    fired: bool,
}

impl CompletionGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_fired(self) -> bool {
        self.fired
    }

    /// Returns `true` exactly once: on the first call made while `complete`
    /// holds. Every later call returns `false`.
    pub fn try_fire(&mut self, complete: bool) -> bool {
        if self.fired || !complete {
            return false;
        }
        self.fired = true;
        true
    }
}
