//! Stable key layout. Changing any of these strings orphans existing data.

use finlingo_core::model::Username;

pub const UNLOCKED_LEVEL: &str = "unlockedLevel";
pub const LAST_COMPLETED_LEVEL: &str = "lastCompletedLevel";
pub const LEVEL_STARS: &str = "levelStars";
pub const TOTAL_COINS: &str = "totalCoins";
pub const THEME: &str = "theme";

/// Usernames may contain the separators used below, so those are escaped.
fn segment(user: &Username) -> String {
    let mut out = String::with_capacity(user.as_str().len());
    for ch in user.as_str().chars() {
        match ch {
            '%' => out.push_str("%25"),
            '.' => out.push_str("%2E"),
            ':' => out.push_str("%3A"),
            other => out.push(other),
        }
    }
    out
}

/// Prefix shared by every progress field of one user.
#[must_use]
pub fn progress_prefix(user: &Username) -> String {
    format!("progress:{}.", segment(user))
}

#[must_use]
pub fn progress_field(user: &Username, field: &str) -> String {
    format!("{}{field}", progress_prefix(user))
}

#[must_use]
pub fn prefs_prefix(user: &Username) -> String {
    format!("prefs:{}.", segment(user))
}

#[must_use]
pub fn prefs_theme(user: &Username) -> String {
    format!("{}{THEME}", prefs_prefix(user))
}

#[must_use]
pub fn goal(user: &Username) -> String {
    format!("goal:{}", segment(user))
}
