use crate::model::ids::{ChallengeId, LevelId};
use crate::model::progress::StarRating;
use crate::model::reward::RewardLedger;

//
// ─── STAR RULES ────────────────────────────────────────────────────────────────
//

/// In-game signals a level gathers while it is played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelSignals {
    /// Challenge rewards paid out this session (completion bonus excluded).
    pub coins_earned: u32,
    /// Incorrect submissions this session.
    pub mistakes: u32,
    /// Savings left at the end of the emergency-fund game, if played.
    pub ending_savings: Option<i64>,
}

/// Level-specific mapping from signals to a `1..=3` rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarRule {
    /// Rewards learners who answer correctly on the first try.
    FirstTry { max_mistakes_for_two: u32 },
    CoinThresholds { three: u32, two: u32 },
    EndingSavings { three: i64, two: i64 },
}

impl StarRule {
    /// Total and deterministic: every input yields one, two or three stars.
    #[must_use]
    pub fn rate(self, signals: &LevelSignals) -> StarRating {
        match self {
            StarRule::FirstTry {
                max_mistakes_for_two,
            } => match signals.mistakes {
                0 => StarRating::THREE,
                n if n <= max_mistakes_for_two => StarRating::TWO,
                _ => StarRating::ONE,
            },
            StarRule::CoinThresholds { three, two } => match signals.coins_earned {
                c if c >= three => StarRating::THREE,
                c if c >= two => StarRating::TWO,
                _ => StarRating::ONE,
            },
            StarRule::EndingSavings { three, two } => match signals.ending_savings {
                Some(s) if s >= three => StarRating::THREE,
                Some(s) if s >= two => StarRating::TWO,
                _ => StarRating::ONE,
            },
        }
    }
}

//
// ─── LEVEL DEFINITIONS ─────────────────────────────────────────────────────────
//

/// One rewardable challenge inside a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeSpec {
    pub id: ChallengeId,
    pub title: &'static str,
    pub reward: u32,
}

/// Everything that differs between levels: challenges, bonus and rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDefinition {
    id: LevelId,
    title: &'static str,
    challenges: Vec<ChallengeSpec>,
    completion_bonus: u32,
    star_rule: StarRule,
}

impl LevelDefinition {
    #[must_use]
    pub fn new(
        id: LevelId,
        title: &'static str,
        challenges: Vec<ChallengeSpec>,
        completion_bonus: u32,
        star_rule: StarRule,
    ) -> Self {
        Self {
            id,
            title,
            challenges,
            completion_bonus,
            star_rule,
        }
    }

    #[must_use]
    pub fn id(&self) -> LevelId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title
    }

    #[must_use]
    pub fn challenges(&self) -> &[ChallengeSpec] {
        &self.challenges
    }

    #[must_use]
    pub fn challenge(&self, id: &ChallengeId) -> Option<&ChallengeSpec> {
        self.challenges.iter().find(|c| &c.id == id)
    }

    /// Ids that must all be completed for the level to count as done.
    pub fn required_challenges(&self) -> impl Iterator<Item = &ChallengeId> {
        self.challenges.iter().map(|c| &c.id)
    }

    #[must_use]
    pub fn completion_bonus(&self) -> u32 {
        self.completion_bonus
    }

    #[must_use]
    pub fn star_rule(&self) -> StarRule {
        self.star_rule
    }

    /// Sum of every challenge reward, bonus excluded.
    #[must_use]
    pub fn max_challenge_coins(&self) -> u32 {
        self.challenges.iter().map(|c| c.reward).sum()
    }

    #[must_use]
    pub fn star_rating(&self, signals: &LevelSignals) -> StarRating {
        self.star_rule.rate(signals)
    }

    /// Fresh ledger for one attempt at this level.
    #[must_use]
    pub fn new_ledger(&self) -> RewardLedger {
        RewardLedger::new(self.challenges.iter().map(|c| (c.id.clone(), c.reward)))
    }
}

fn challenge(id: &'static str, title: &'static str, reward: u32) -> ChallengeSpec {
    ChallengeSpec {
        id: ChallengeId::from_static(id),
        title,
        reward,
    }
}

/// The five shipped levels.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    #[must_use]
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        Self { levels }
    }

    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            LevelDefinition::new(
                LevelId::FIRST,
                "Money Basics",
                vec![
                    challenge("barter", "Trading without money", 10),
                    challenge("coinCount", "Counting coins", 15),
                    challenge("needsWants", "Needs vs wants", 20),
                    challenge("piggyBank", "Filling the piggy bank", 22),
                    challenge("priceCompare", "Comparing prices", 25),
                ],
                50,
                StarRule::FirstTry {
                    max_mistakes_for_two: 2,
                },
            ),
            LevelDefinition::new(
                LevelId::SECOND,
                "Paycheck Quest",
                vec![
                    challenge("rateCalc", "Pay rate simulator", 18),
                    challenge("payslipMatch", "Payslip matching", 22),
                    challenge("bonusRules", "Bonus rules", 20),
                    challenge("dealAnalysis", "Deal analyzer", 25),
                    challenge("paycheckPlan", "Paycheck plan", 30),
                ],
                60,
                StarRule::CoinThresholds { three: 130, two: 80 },
            ),
            LevelDefinition::new(
                LevelId::THIRD,
                "Budget Builder",
                vec![
                    challenge("budgetTotal", "Adding up a budget", 15),
                    challenge("fixedVsFlexible", "Fixed vs flexible costs", 18),
                    challenge("envelopes", "Envelope budgeting", 20),
                    challenge("overspendFix", "Fixing an overspend", 22),
                    challenge("budgetPlan", "Monthly budget plan", 30),
                ],
                60,
                StarRule::CoinThresholds { three: 130, two: 80 },
            ),
            LevelDefinition::new(
                LevelId::FOURTH,
                "Credit Card Basics",
                vec![
                    challenge("creditVsDebit", "Credit vs debit", 18),
                    challenge("interestCalc", "Interest calculator", 20),
                    challenge("minimumPayment", "Minimum payment trap", 22),
                    challenge("scoreFactors", "Credit score factors", 25),
                ],
                70,
                StarRule::CoinThresholds { three: 120, two: 70 },
            ),
            LevelDefinition::new(
                LevelId::LAST,
                "Emergency Fund",
                vec![
                    challenge("phoneEmergency", "Phone emergency", 10),
                    challenge("noPaycheck", "No paycheck this week", 10),
                    challenge("birthdayParty", "Friend's birthday party", 10),
                ],
                50,
                StarRule::EndingSavings { three: 70, two: 40 },
            ),
        ])
    }

    #[must_use]
    pub fn get(&self, id: LevelId) -> Option<&LevelDefinition> {
        self.levels.iter().find(|level| level.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
