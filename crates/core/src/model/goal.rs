use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GoalError {
    #[error("goal name cannot be empty")]
    EmptyName,

    #[error("goal price must be greater than zero")]
    InvalidPrice,

    #[error("deposit must be greater than zero")]
    InvalidDeposit,

    #[error("deposit of {deposit} would overfill the jar ({saved} of {price} saved)")]
    WouldOverfill { saved: u64, price: u64, deposit: u64 },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// A single savings target, amounts in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredGoal")]
pub struct SavingsGoal {
    name: String,
    price: u64,
    saved: u64,
    created_at: DateTime<Utc>,
}

/// Raw document shape; checked by `SavingsGoal::new` on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGoal {
    name: String,
    price: u64,
    saved: u64,
    created_at: DateTime<Utc>,
}

impl TryFrom<StoredGoal> for SavingsGoal {
    type Error = GoalError;

    fn try_from(raw: StoredGoal) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.price, raw.saved, raw.created_at)
    }
}

impl SavingsGoal {
    /// Create a goal, carrying over any amount already in the jar.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::EmptyName` or `GoalError::InvalidPrice`.
    pub fn new(
        name: impl Into<String>,
        price: u64,
        saved: u64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GoalError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(GoalError::EmptyName);
        }
        if price == 0 {
            return Err(GoalError::InvalidPrice);
        }
        Ok(Self {
            name,
            price,
            saved,
            created_at,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn price(&self) -> u64 {
        self.price
    }

    #[must_use]
    pub fn saved(&self) -> u64 {
        self.saved
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn is_reached(&self) -> bool {
        self.saved >= self.price
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.price.saturating_sub(self.saved)
    }

    /// Filled share of the jar, capped at 100.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        ((self.saved as f64 / self.price as f64) * 100.0).min(100.0)
    }

    /// Drop money into the jar. Returns `true` once the goal is reached.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::InvalidDeposit` for zero, and
    /// `GoalError::WouldOverfill` if the jar would hold more than the price.
    pub fn deposit(&mut self, amount: u64) -> Result<bool, GoalError> {
        if amount == 0 {
            return Err(GoalError::InvalidDeposit);
        }
        let next = self.saved.saturating_add(amount);
        if next > self.price {
            return Err(GoalError::WouldOverfill {
                saved: self.saved,
                price: self.price,
                deposit: amount,
            });
        }
        self.saved = next;
        Ok(self.is_reached())
    }
}

/// Parse a dollar amount such as `12`, `12.5` or `12.50` into cents.
///
/// # Errors
///
/// Returns `GoalError::InvalidAmount` for anything else.
pub fn parse_cents(raw: &str) -> Result<u64, GoalError> {
    let invalid = || GoalError::InvalidAmount(raw.to_owned());
    let trimmed = raw.trim().trim_start_matches('$');
    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let frac: u64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<u64>().map_err(|_| invalid())? * 10,
        _ => frac.parse().map_err(|_| invalid())?,
    };
    whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac))
        .ok_or_else(invalid)
}

/// Render cents as `$12.50`.
#[must_use]
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
