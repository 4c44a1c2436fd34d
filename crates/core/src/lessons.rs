//! Answer checkers for the arithmetic lessons.

use thiserror::Error;

use crate::model::ChallengeId;

/// Hourly pay tiers offered in the pay-rate simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateTier {
    Starter,
    Standard,
    Pro,
}

impl RateTier {
    #[must_use]
    pub fn coins_per_hour(self) -> u32 {
        match self {
            RateTier::Starter => 8,
            RateTier::Standard => 12,
            RateTier::Pro => 16,
        }
    }
}

#[must_use]
pub fn earned_for_shift(hours: u32, coins_per_hour: u32) -> u32 {
    hours.saturating_mul(coins_per_hour)
}

/// Checks a typed answer to "you worked X hours at Y coins/hr".
#[must_use]
pub fn check_shift_answer(hours: u32, tier: RateTier, answer: &str) -> bool {
    answer
        .trim()
        .parse::<u32>()
        .is_ok_and(|value| value == earned_for_shift(hours, tier.coins_per_hour()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub title: String,
    pub hours: u32,
    pub pay: u32,
}

impl Offer {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rate(&self) -> f64 {
        if self.hours == 0 {
            return 0.0;
        }
        f64::from(self.pay) / f64::from(self.hours)
    }
}

/// Offer with the best coins per hour; ties keep the earlier offer.
#[must_use]
pub fn best_offer(offers: &[Offer]) -> Option<&Offer> {
    offers.iter().fold(None, |best: Option<&Offer>, offer| match best {
        Some(current) if current.rate() >= offer.rate() => Some(current),
        _ => Some(offer),
    })
}

/// First rule a paycheck plan breaks.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanViolation {
    #[error("your plan must total exactly 100% (currently {0}%)")]
    Total(u32),

    #[error("save should be at least 20% for a strong plan")]
    SaveTooLow,

    #[error("share should be at least 10%")]
    ShareTooLow,

    #[error("spend should be 60% or less for balance")]
    SpendTooHigh,
}

/// Save ≥ 20, share ≥ 10, spend ≤ 60, all summing to 100.
///
/// # Errors
///
/// Returns the first `PlanViolation`, checked in that order after the total.
pub fn check_paycheck_plan(save: u32, spend: u32, share: u32) -> Result<(), PlanViolation> {
    let total = save.saturating_add(spend).saturating_add(share);
    if total != 100 {
        return Err(PlanViolation::Total(total));
    }
    if save < 20 {
        return Err(PlanViolation::SaveTooLow);
    }
    if share < 10 {
        return Err(PlanViolation::ShareTooLow);
    }
    if spend > 60 {
        return Err(PlanViolation::SpendTooHigh);
    }
    Ok(())
}

/// Simple (non-compounding) interest owed after `periods`.
#[must_use]
pub fn simple_interest(principal: u32, rate_percent: u32, periods: u32) -> u32 {
    principal
        .saturating_mul(rate_percent)
        .saturating_mul(periods)
        / 100
}

/// Payslip slots in display order.
pub const PAYSLIP_SLOTS: [&str; 4] = ["earned", "bonus", "town", "takehome"];

/// Every slot must hold the piece with the same key.
#[must_use]
pub fn payslip_matches(placed: &[(&str, &str)]) -> bool {
    PAYSLIP_SLOTS.iter().all(|slot| {
        placed
            .iter()
            .any(|(placed_slot, piece)| placed_slot == slot && piece == slot)
    })
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Shift asked about in the pay-rate challenge.
pub const SHIFT_QUESTION: (u32, RateTier) = (3, RateTier::Standard);

/// Loan asked about in the interest challenge: principal, rate, periods.
pub const INTEREST_QUESTION: (u32, u32, u32) = (200, 10, 2);

/// Bonus rule that actually earns a bonus.
pub const BONUS_RULE: &str = "consistency";

/// Offers compared in the deal challenge.
#[must_use]
pub fn deal_offers() -> Vec<Offer> {
    vec![
        Offer { title: "Offer A".into(), hours: 2, pay: 26 },
        Offer { title: "Offer B".into(), hours: 3, pay: 33 },
        Offer { title: "Offer C".into(), hours: 1, pay: 10 },
    ]
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("{0} has no typed answer to check")]
    NotGraded(ChallengeId),
}

/// True when the challenge is judged from a typed answer.
#[must_use]
pub fn is_graded(challenge: &ChallengeId) -> bool {
    grade_answer(challenge, "").is_ok()
}

/// Check a typed answer.
///
/// Formats: `rateCalc` and `interestCalc` take a number, `payslipMatch` the
/// pieces in slot order separated by commas, `bonusRules` the rule name,
/// `dealAnalysis` the offer letter or title, `paycheckPlan` `save,spend,share`.
///
/// # Errors
///
/// Returns `AnswerError::NotGraded` for challenges without a checker.
pub fn grade_answer(challenge: &ChallengeId, answer: &str) -> Result<bool, AnswerError> {
    let answer = answer.trim();
    let correct = match challenge.as_str() {
        "rateCalc" => {
            let (hours, tier) = SHIFT_QUESTION;
            check_shift_answer(hours, tier, answer)
        }
        "payslipMatch" => {
            let placed: Vec<(&str, &str)> = PAYSLIP_SLOTS
                .iter()
                .copied()
                .zip(answer.split(',').map(str::trim))
                .collect();
            payslip_matches(&placed)
        }
        "bonusRules" => answer.eq_ignore_ascii_case(BONUS_RULE),
        "dealAnalysis" => {
            let offers = deal_offers();
            best_offer(&offers).is_some_and(|best| {
                answer.eq_ignore_ascii_case(&best.title)
                    || best
                        .title
                        .strip_prefix("Offer ")
                        .is_some_and(|letter| answer.eq_ignore_ascii_case(letter))
            })
        }
        "paycheckPlan" => {
            let parts: Result<Vec<u32>, _> = answer
                .split(',')
                .map(|part| part.trim().parse::<u32>())
                .collect();
            matches!(parts.as_deref(), Ok([save, spend, share])
                if check_paycheck_plan(*save, *spend, *share).is_ok())
        }
        "interestCalc" => {
            let (principal, rate, periods) = INTEREST_QUESTION;
            answer
                .parse::<u32>()
                .is_ok_and(|value| value == simple_interest(principal, rate, periods))
        }
        _ => return Err(AnswerError::NotGraded(challenge.clone())),
    };
    Ok(correct)
}
