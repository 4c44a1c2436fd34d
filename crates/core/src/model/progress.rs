use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::LevelId;

/// Best rating achieved on a level, `0..=3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub const MAX: u8 = 3;
    pub const NONE: StarRating = StarRating(0);
    pub const ONE: StarRating = StarRating(1);
    pub const TWO: StarRating = StarRating(2);
    pub const THREE: StarRating = StarRating(3);

    /// Values above three saturate to three.
    #[must_use]
    pub fn new(stars: u8) -> Self {
        Self(stars.min(Self::MAX))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_perfect(self) -> bool {
        self.0 == Self::MAX
    }
}

impl From<u8> for StarRating {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

/// Durable per-user progress.
///
/// Invariants maintained by the mutators below:
/// - `unlocked_level` never decreases;
/// - a recorded star rating never decreases;
/// - `total_coins` only decreases through [`ProgressRecord::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    unlocked_level: LevelId,
    last_completed_level: Option<LevelId>,
    level_stars: BTreeMap<LevelId, StarRating>,
    total_coins: u64,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            unlocked_level: LevelId::FIRST,
            last_completed_level: None,
            level_stars: BTreeMap::new(),
            total_coins: 0,
        }
    }
}

impl ProgressRecord {
    /// Rehydrate a record from already-sanitized persisted fields.
    #[must_use]
    pub fn from_persisted(
        unlocked_level: LevelId,
        last_completed_level: Option<LevelId>,
        level_stars: BTreeMap<LevelId, StarRating>,
        total_coins: u64,
    ) -> Self {
        Self {
            unlocked_level,
            last_completed_level,
            level_stars,
            total_coins,
        }
    }

    #[must_use]
    pub fn unlocked_level(&self) -> LevelId {
        self.unlocked_level
    }

    #[must_use]
    pub fn last_completed_level(&self) -> Option<LevelId> {
        self.last_completed_level
    }

    #[must_use]
    pub fn level_stars(&self) -> &BTreeMap<LevelId, StarRating> {
        &self.level_stars
    }

    /// Recorded rating for a level, `StarRating::NONE` if never completed.
    #[must_use]
    pub fn stars_for(&self, level: LevelId) -> StarRating {
        self.level_stars.get(&level).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn total_coins(&self) -> u64 {
        self.total_coins
    }

    /// A level counts as completed once any rating has been recorded for it.
    #[must_use]
    pub fn is_completed(&self, level: LevelId) -> bool {
        self.stars_for(level) > StarRating::NONE
    }

    #[must_use]
    pub fn completed_levels(&self) -> usize {
        LevelId::all().filter(|id| self.is_completed(*id)).count()
    }

    pub fn credit_coins(&mut self, amount: u64) {
        self.total_coins = self.total_coins.saturating_add(amount);
    }

    /// Record a rating, keeping the better of the old and new value.
    ///
    /// Returns the rating now stored.
    pub fn record_stars(&mut self, level: LevelId, stars: StarRating) -> StarRating {
        let entry = self.level_stars.entry(level).or_default();
        *entry = (*entry).max(stars);
        *entry
    }

    pub fn mark_last_completed(&mut self, level: LevelId) {
        self.last_completed_level = Some(level);
    }

    /// Clears the one-shot completion signal, returning what was there.
    pub fn take_last_completed(&mut self) -> Option<LevelId> {
        self.last_completed_level.take()
    }

    /// Raise the unlock frontier. Lower values are ignored.
    ///
    /// Returns `true` if the frontier moved.
    pub fn raise_unlocked_level(&mut self, level: LevelId) -> bool {
        if level > self.unlocked_level {
            self.unlocked_level = level;
            true
        } else {
            false
        }
    }

    /// Explicit reset back to a fresh learner.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
