//! Level-select progression.
//!
//! Every visit to the level-select screen recomputes the unlock frontier from
//! two stored integers: the current frontier and the one-shot "just completed"
//! signal. The machine walks Start → Check → (Advance) → Clear → Render and
//! keeps no state of its own between visits.

use crate::model::ids::{GRID_SLOTS, LevelId, PLAYABLE_LEVELS};
use crate::model::progress::{ProgressRecord, StarRating};

/// Phase of a single home-screen visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockPhase {
    Start,
    Check,
    Advance,
    Clear,
    Render,
}

/// Outcome of the Check/Advance steps for one visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockDecision {
    pub unlocked_level: LevelId,
    /// Set only when the frontier moved during this visit.
    pub newly_unlocked: Option<LevelId>,
    /// Whether a completion signal was present and must be cleared.
    pub consumed_signal: bool,
}

impl UnlockDecision {
    /// Phases the visit went through, in order.
    #[must_use]
    pub fn trace(&self) -> Vec<UnlockPhase> {
        let mut phases = vec![UnlockPhase::Start, UnlockPhase::Check];
        if self.newly_unlocked.is_some() {
            phases.push(UnlockPhase::Advance);
        }
        if self.consumed_signal {
            phases.push(UnlockPhase::Clear);
        }
        phases.push(UnlockPhase::Render);
        phases
    }
}

/// Check + Advance: at most one step past the completed level, never beyond
/// the last playable level, never backwards.
#[must_use]
pub fn plan_unlock(unlocked_level: LevelId, last_completed: Option<LevelId>) -> UnlockDecision {
    let Some(completed) = last_completed else {
        return UnlockDecision {
            unlocked_level,
            newly_unlocked: None,
            consumed_signal: false,
        };
    };

    let candidate = completed.next();
    if candidate <= unlocked_level {
        return UnlockDecision {
            unlocked_level,
            newly_unlocked: None,
            consumed_signal: true,
        };
    }

    UnlockDecision {
        unlocked_level: candidate,
        newly_unlocked: Some(candidate),
        consumed_signal: true,
    }
}

/// Runs one full visit against a record: advances and clears the signal.
pub fn visit_home(record: &mut ProgressRecord) -> UnlockDecision {
    let decision = plan_unlock(record.unlocked_level(), record.last_completed_level());
    if let Some(level) = decision.newly_unlocked {
        record.raise_unlocked_level(level);
    }
    record.take_last_completed();
    decision
}

//
// ─── GRID ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Open { stars: StarRating },
    Locked,
    ComingSoon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTile {
    pub slot: u8,
    pub state: TileState,
}

impl LevelTile {
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        matches!(self.state, TileState::Open { .. })
    }
}

/// Render: slots `1..=15`, where only unlocked playable levels can be opened.
#[must_use]
pub fn level_grid(record: &ProgressRecord) -> Vec<LevelTile> {
    (1..=GRID_SLOTS)
        .map(|slot| {
            let state = match LevelId::new(slot) {
                Ok(level) if level <= record.unlocked_level() => TileState::Open {
                    stars: record.stars_for(level),
                },
                Ok(_) => TileState::Locked,
                Err(_) => TileState::ComingSoon,
            };
            LevelTile { slot, state }
        })
        .collect()
}

/// Result of tapping a grid slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileSelection {
    Open(LevelId),
    /// Informational no-op.
    Notice(String),
}

#[must_use]
pub fn select_slot(unlocked_level: LevelId, slot: u32) -> TileSelection {
    let level = u8::try_from(slot)
        .ok()
        .filter(|s| *s <= PLAYABLE_LEVELS)
        .and_then(|s| LevelId::new(s).ok());

    match level {
        None => TileSelection::Notice("These levels are coming soon".to_owned()),
        Some(level) if level > unlocked_level => TileSelection::Notice(format!(
            "Open level {unlocked_level} to unlock this level."
        )),
        Some(level) => TileSelection::Open(level),
    }
}

#[must_use]
pub fn unlocked_notice(level: LevelId) -> String {
    format!("Unlocked level {level}!")
}
