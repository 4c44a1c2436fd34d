use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::model::ids::ChallengeId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RewardError {
    #[error("unknown challenge: {0}")]
    UnknownChallenge(ChallengeId),
}

/// Result of checking one challenge answer against the session ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardOutcome {
    /// First correct answer this session; the caller credits `amount` coins.
    FirstTimeReward(u32),
    /// Correct again, but the reward was already paid out.
    AlreadyRewarded,
    Incorrect,
}

impl RewardOutcome {
    #[must_use]
    pub fn coins(self) -> u32 {
        match self {
            RewardOutcome::FirstTimeReward(amount) => amount,
            RewardOutcome::AlreadyRewarded | RewardOutcome::Incorrect => 0,
        }
    }

    #[must_use]
    pub fn is_correct(self) -> bool {
        !matches!(self, RewardOutcome::Incorrect)
    }
}

/// Per-session record of which challenges have paid out.
///
/// Lives only as long as one level attempt; a fresh attempt starts empty.
/// Reward amounts are fixed per challenge and supplied up front.
#[derive(Debug, Clone, Default)]
pub struct RewardLedger {
    rewards: BTreeMap<ChallengeId, u32>,
    rewarded: BTreeSet<ChallengeId>,
    completed: BTreeSet<ChallengeId>,
}

impl RewardLedger {
    #[must_use]
    pub fn new(rewards: impl IntoIterator<Item = (ChallengeId, u32)>) -> Self {
        Self {
            rewards: rewards.into_iter().collect(),
            rewarded: BTreeSet::new(),
            completed: BTreeSet::new(),
        }
    }

    /// Classify an answer without touching the ledger.
    ///
    /// # Errors
    ///
    /// Returns `RewardError::UnknownChallenge` if the challenge has no reward
    /// configured.
    pub fn classify(
        &self,
        challenge: &ChallengeId,
        is_correct: bool,
    ) -> Result<RewardOutcome, RewardError> {
        let amount = *self
            .rewards
            .get(challenge)
            .ok_or_else(|| RewardError::UnknownChallenge(challenge.clone()))?;

        if !is_correct {
            Ok(RewardOutcome::Incorrect)
        } else if self.rewarded.contains(challenge) {
            Ok(RewardOutcome::AlreadyRewarded)
        } else {
            Ok(RewardOutcome::FirstTimeReward(amount))
        }
    }

    /// Classify an answer and, on the first correct one, lock the reward.
    ///
    /// # Errors
    ///
    /// Returns `RewardError::UnknownChallenge` if the challenge has no reward
    /// configured. The ledger is left untouched in that case.
    pub fn evaluate(
        &mut self,
        challenge: &ChallengeId,
        is_correct: bool,
    ) -> Result<RewardOutcome, RewardError> {
        let outcome = self.classify(challenge, is_correct)?;
        if outcome.is_correct() {
            self.completed.insert(challenge.clone());
            self.rewarded.insert(challenge.clone());
        }
        Ok(outcome)
    }

    #[must_use]
    pub fn reward_for(&self, challenge: &ChallengeId) -> Option<u32> {
        self.rewards.get(challenge).copied()
    }

    #[must_use]
    pub fn is_rewarded(&self, challenge: &ChallengeId) -> bool {
        self.rewarded.contains(challenge)
    }

    #[must_use]
    pub fn is_completed(&self, challenge: &ChallengeId) -> bool {
        self.completed.contains(challenge)
    }

    #[must_use]
    pub fn completed(&self) -> &BTreeSet<ChallengeId> {
        &self.completed
    }

    #[must_use]
    pub fn rewarded(&self) -> &BTreeSet<ChallengeId> {
        &self.rewarded
    }

    /// Sum of rewards paid out so far in this session.
    #[must_use]
    pub fn coins_paid(&self) -> u32 {
        self.rewarded
            .iter()
            .filter_map(|id| self.rewards.get(id))
            .sum()
    }
}
