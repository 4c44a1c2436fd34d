//! Emergency-fund week simulator played in the last level.
//!
//! Savings start at 100 and every finished week pays 20 before the next
//! scenario. Each scenario asks how to cover one surprise cost.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::ChallengeId;

pub const STARTING_SAVINGS: i64 = 100;
pub const WEEKLY_INCOME: i64 = 20;

const SAVINGS_POINTS: i64 = 25;
const ALTERNATIVE_POINTS: i64 = 20;
const CREDIT_PENALTY: i64 = -10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScenarioError {
    #[error("all weeks have been played")]
    Finished,

    #[error("unknown choice: {0}")]
    UnknownChoice(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    UseSavings,
    Credit,
    /// Resourceful option (old phone, ask family, homemade gift).
    Alternative,
}

impl FromStr for Choice {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "savings" | "pay" => Ok(Choice::UseSavings),
            "credit" => Ok(Choice::Credit),
            "alternative" | "skip" | "family" | "parents" => Ok(Choice::Alternative),
            other => Err(ScenarioError::UnknownChoice(other.to_owned())),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Choice::UseSavings => "savings",
            Choice::Credit => "credit",
            Choice::Alternative => "alternative",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub challenge: ChallengeId,
    pub title: &'static str,
    pub cost: i64,
    pub alternative: &'static str,
}

#[must_use]
pub fn standard_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            challenge: ChallengeId::from_static("phoneEmergency"),
            title: "Phone Emergency",
            cost: 60,
            alternative: "Use your old phone",
        },
        Scenario {
            challenge: ChallengeId::from_static("noPaycheck"),
            title: "No Paycheck This Week",
            cost: 20,
            alternative: "Ask family for help",
        },
        Scenario {
            challenge: ChallengeId::from_static("birthdayParty"),
            title: "Friend's Birthday Party",
            cost: 15,
            alternative: "Make a homemade gift",
        },
    ]
}

/// What one decision did to the game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub challenge: ChallengeId,
    pub choice: Choice,
    pub savings_after: i64,
    pub score_delta: i64,
    /// False when the jar could not pay for the savings choice; nothing is
    /// spent or scored and the week still ends.
    pub covered: bool,
}

#[derive(Debug, Clone)]
pub struct EmergencyFundGame {
    scenarios: Vec<Scenario>,
    index: usize,
    savings: i64,
    credit_debt: i64,
    score: i64,
}

impl Default for EmergencyFundGame {
    fn default() -> Self {
        Self::new(standard_scenarios())
    }
}

impl EmergencyFundGame {
    #[must_use]
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self {
            scenarios,
            index: 0,
            savings: STARTING_SAVINGS,
            credit_debt: 0,
            score: 0,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Scenario> {
        self.scenarios.get(self.index)
    }

    /// One-based week number of the current scenario.
    #[must_use]
    pub fn week(&self) -> usize {
        self.index + 1
    }

    #[must_use]
    pub fn savings(&self) -> i64 {
        self.savings
    }

    #[must_use]
    pub fn credit_debt(&self) -> i64 {
        self.credit_debt
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.index >= self.scenarios.len()
    }

    /// Resolve the current scenario and move to the next week.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::Finished` once every scenario is played.
    pub fn choose(&mut self, choice: Choice) -> Result<Decision, ScenarioError> {
        let scenario = self.current().cloned().ok_or(ScenarioError::Finished)?;

        let (score_delta, covered) = match choice {
            Choice::UseSavings if self.savings >= scenario.cost => {
                self.savings -= scenario.cost;
                (SAVINGS_POINTS, true)
            }
            Choice::UseSavings => (0, false),
            Choice::Credit => {
                self.credit_debt += scenario.cost;
                (CREDIT_PENALTY, true)
            }
            Choice::Alternative => (ALTERNATIVE_POINTS, true),
        };
        self.score += score_delta;
        let savings_after = self.savings;

        self.index += 1;
        if !self.is_finished() {
            self.savings += WEEKLY_INCOME;
        }

        Ok(Decision {
            challenge: scenario.challenge,
            choice,
            savings_after,
            score_delta,
            covered,
        })
    }

}
