use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Number of levels that can actually be played.
pub const PLAYABLE_LEVELS: u8 = 5;

/// Number of tiles shown on the level-select grid (playable + coming soon).
pub const GRID_SLOTS: u8 = 15;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelIdError {
    #[error("level {0} is not playable (expected 1..={PLAYABLE_LEVELS})")]
    OutOfRange(i64),

    #[error("invalid level: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UsernameError {
    #[error("username cannot be empty")]
    Empty,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChallengeIdError {
    #[error("challenge id cannot be empty")]
    Empty,
}

//
// ─── LEVEL ID ──────────────────────────────────────────────────────────────────
//

/// A playable level, always within `1..=PLAYABLE_LEVELS`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LevelId(u8);

impl LevelId {
    pub const FIRST: LevelId = LevelId(1);
    pub const SECOND: LevelId = LevelId(2);
    pub const THIRD: LevelId = LevelId(3);
    pub const FOURTH: LevelId = LevelId(4);
    pub const LAST: LevelId = LevelId(PLAYABLE_LEVELS);

    /// Creates a `LevelId`.
    ///
    /// # Errors
    ///
    /// Returns `LevelIdError::OutOfRange` for anything outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, LevelIdError> {
        Self::try_from(i64::from(value))
    }

    /// Clamp an arbitrary stored integer into the playable range.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(1, i64::from(PLAYABLE_LEVELS));
        // clamp guarantees the value fits
        Self(u8::try_from(clamped).unwrap_or(1))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// The following level, saturating at the last playable level.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1).min(PLAYABLE_LEVELS))
    }

    /// All playable levels in order.
    pub fn all() -> impl Iterator<Item = LevelId> {
        (1..=PLAYABLE_LEVELS).map(LevelId)
    }
}

impl TryFrom<i64> for LevelId {
    type Error = LevelIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (1..=i64::from(PLAYABLE_LEVELS)).contains(&value) {
            u8::try_from(value)
                .map(LevelId)
                .map_err(|_| LevelIdError::OutOfRange(value))
        } else {
            Err(LevelIdError::OutOfRange(value))
        }
    }
}

impl TryFrom<u8> for LevelId {
    type Error = LevelIdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<LevelId> for u8 {
    fn from(id: LevelId) -> Self {
        id.0
    }
}

impl fmt::Debug for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelId({})", self.0)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LevelId {
    type Err = LevelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| LevelIdError::Invalid(s.to_owned()))?;
        Self::try_from(raw)
    }
}

//
// ─── CHALLENGE ID ──────────────────────────────────────────────────────────────
//

/// Key of a single challenge inside a level (e.g. `barter`, `rateCalc`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChallengeId(String);

impl ChallengeId {
    /// # Errors
    ///
    /// Returns `ChallengeIdError::Empty` if the trimmed key is empty.
    pub fn new(raw: impl Into<String>) -> Result<Self, ChallengeIdError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ChallengeIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub(crate) fn from_static(raw: &'static str) -> Self {
        Self(raw.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChallengeId({})", self.0)
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChallengeId {
    type Err = ChallengeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

//
// ─── USERNAME ──────────────────────────────────────────────────────────────────
//

/// Stable key for everything persisted on behalf of a learner.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub const GUEST: &'static str = "guest";

    /// # Errors
    ///
    /// Returns `UsernameError::Empty` if the trimmed name is empty.
    pub fn new(raw: impl Into<String>) -> Result<Self, UsernameError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn guest() -> Self {
        Self(Self::GUEST.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Username {
    fn default() -> Self {
        Self::guest()
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username({})", self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

//
// ─── SESSION ID ────────────────────────────────────────────────────────────────
//

/// Identifies one level attempt, from mount to unmount. Used for log correlation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
