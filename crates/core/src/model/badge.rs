use crate::model::ids::LevelId;
use crate::model::progress::ProgressRecord;

/// Coins needed for the collector badge.
pub const COIN_COLLECTOR_THRESHOLD: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRule {
    CompleteLevel(LevelId),
    PerfectLevel(LevelId),
    CoinsAtLeast(u64),
    AllLevels,
}

impl BadgeRule {
    #[must_use]
    pub fn is_met(self, record: &ProgressRecord) -> bool {
        match self {
            BadgeRule::CompleteLevel(level) => record.is_completed(level),
            BadgeRule::PerfectLevel(level) => record.stars_for(level).is_perfect(),
            BadgeRule::CoinsAtLeast(min) => record.total_coins() >= min,
            BadgeRule::AllLevels => LevelId::all().all(|level| record.is_completed(level)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub id: &'static str,
    pub title: &'static str,
    pub requirement: &'static str,
    /// Bonus badges are shown apart from the per-level ones.
    pub special: bool,
    pub rule: BadgeRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeStatus {
    pub badge: Badge,
    pub earned: bool,
}

const fn level_badge(
    id: &'static str,
    title: &'static str,
    requirement: &'static str,
    level: LevelId,
) -> Badge {
    Badge {
        id,
        title,
        requirement,
        special: false,
        rule: BadgeRule::CompleteLevel(level),
    }
}

#[must_use]
pub fn all_badges() -> Vec<Badge> {
    let [l1, l2, l3, l4, l5] = [
        LevelId::FIRST,
        LevelId::SECOND,
        LevelId::THIRD,
        LevelId::FOURTH,
        LevelId::LAST,
    ];
    vec![
        level_badge("level1", "Piggy Bank Pro", "Finish Level 1", l1),
        level_badge("level2", "Paycheck Pro", "Finish Level 2", l2),
        level_badge("level3", "Budget Boss", "Finish Level 3", l3),
        level_badge("level4", "Credit Card Captain", "Finish Level 4", l4),
        level_badge("level5", "Emergency Expert", "Finish Level 5", l5),
        Badge {
            id: "perfect1",
            title: "Gold Star Saver",
            requirement: "Get 3 stars in Level 1",
            special: true,
            rule: BadgeRule::PerfectLevel(l1),
        },
        Badge {
            id: "perfect5",
            title: "Emergency Master",
            requirement: "Get 3 stars in Level 5",
            special: true,
            rule: BadgeRule::PerfectLevel(l5),
        },
        Badge {
            id: "coins100",
            title: "Coin Collector",
            requirement: "Collect 100+ coins total",
            special: true,
            rule: BadgeRule::CoinsAtLeast(COIN_COLLECTOR_THRESHOLD),
        },
        Badge {
            id: "allLevels",
            title: "Finlingo Master",
            requirement: "Complete all 5 levels",
            special: true,
            rule: BadgeRule::AllLevels,
        },
    ]
}

#[must_use]
pub fn evaluate_badges(record: &ProgressRecord) -> Vec<BadgeStatus> {
    all_badges()
        .into_iter()
        .map(|badge| BadgeStatus {
            earned: badge.rule.is_met(record),
            badge,
        })
        .collect()
}
