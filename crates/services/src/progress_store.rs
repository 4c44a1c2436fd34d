use std::collections::BTreeMap;
use std::sync::Arc;

use finlingo_core::model::{LevelId, ProgressRecord, StarRating, Username};
use storage::keys;
use storage::repository::{KeyValueStore, KvWrite};
use tracing::{debug, warn};

use crate::error::ProgressError;

/// Typed, per-user view over the key-value store.
///
/// Every mutator is a full load-modify-save cycle; there is no partial-field
/// primitive, so two writers on the same user overwrite each other.
#[derive(Clone)]
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load a user's progress, substituting defaults for missing or malformed fields.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` only if the backend itself fails.
    pub async fn load(&self, user: &Username) -> Result<ProgressRecord, ProgressError> {
        let unlocked_raw = self
            .kv
            .get(&keys::progress_field(user, keys::UNLOCKED_LEVEL))
            .await?;
        let last_raw = self
            .kv
            .get(&keys::progress_field(user, keys::LAST_COMPLETED_LEVEL))
            .await?;
        let stars_raw = self
            .kv
            .get(&keys::progress_field(user, keys::LEVEL_STARS))
            .await?;
        let coins_raw = self
            .kv
            .get(&keys::progress_field(user, keys::TOTAL_COINS))
            .await?;

        let record = ProgressRecord::from_persisted(
            decode_unlocked(user, unlocked_raw.as_deref()),
            decode_last_completed(user, last_raw.as_deref()),
            decode_stars(user, stars_raw.as_deref()),
            decode_coins(user, coins_raw.as_deref()),
        );
        debug!(%user, unlocked = %record.unlocked_level(), coins = record.total_coins(), "loaded progress");
        Ok(record)
    }

    /// Overwrite every progress field for the user.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the write fails.
    pub async fn save(&self, user: &Username, record: &ProgressRecord) -> Result<(), ProgressError> {
        let last_key = keys::progress_field(user, keys::LAST_COMPLETED_LEVEL);
        let last = match record.last_completed_level() {
            Some(level) => KvWrite::put(last_key, level.to_string()),
            None => KvWrite::remove(last_key),
        };

        let stars: BTreeMap<String, u8> = record
            .level_stars()
            .iter()
            .map(|(level, stars)| (level.to_string(), stars.value()))
            .collect();
        let stars = serde_json::to_string(&stars)
            .map_err(|e| storage::repository::StorageError::Serialization(e.to_string()))?;

        self.kv
            .apply(vec![
                KvWrite::put(
                    keys::progress_field(user, keys::UNLOCKED_LEVEL),
                    record.unlocked_level().to_string(),
                ),
                last,
                KvWrite::put(keys::progress_field(user, keys::LEVEL_STARS), stars),
                KvWrite::put(
                    keys::progress_field(user, keys::TOTAL_COINS),
                    record.total_coins().to_string(),
                ),
            ])
            .await?;
        Ok(())
    }

    /// Read-modify-write helper used by every convenience mutator.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the load or save fails.
    pub async fn update<T>(
        &self,
        user: &Username,
        mutate: impl FnOnce(&mut ProgressRecord) -> T + Send,
    ) -> Result<T, ProgressError> {
        let mut record = self.load(user).await?;
        let out = mutate(&mut record);
        self.save(user, &record).await?;
        Ok(out)
    }

    /// Returns the new coin total.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on backend failure.
    pub async fn credit_coins(&self, user: &Username, amount: u64) -> Result<u64, ProgressError> {
        self.update(user, |record| {
            record.credit_coins(amount);
            record.total_coins()
        })
        .await
    }

    /// Stores `max(existing, stars)` and returns what ended up stored.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on backend failure.
    pub async fn set_level_stars(
        &self,
        user: &Username,
        level: LevelId,
        stars: StarRating,
    ) -> Result<StarRating, ProgressError> {
        self.update(user, |record| record.record_stars(level, stars))
            .await
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on backend failure.
    pub async fn mark_last_completed(
        &self,
        user: &Username,
        level: LevelId,
    ) -> Result<(), ProgressError> {
        self.update(user, |record| record.mark_last_completed(level))
            .await
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on backend failure.
    pub async fn clear_last_completed(&self, user: &Username) -> Result<(), ProgressError> {
        self.update(user, |record| {
            record.take_last_completed();
        })
        .await
    }

    /// Explicit reset: the only path that lowers coins or the unlock frontier.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on backend failure.
    pub async fn reset(&self, user: &Username) -> Result<(), ProgressError> {
        let removed = self.kv.remove_prefix(&keys::progress_prefix(user)).await?;
        debug!(%user, removed, "progress reset");
        Ok(())
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    serde_json::from_str::<i64>(raw.trim()).ok()
}

fn decode_unlocked(user: &Username, raw: Option<&str>) -> LevelId {
    let Some(raw) = raw else {
        return LevelId::FIRST;
    };
    match parse_int(raw) {
        Some(value) => LevelId::clamped(value),
        None => {
            warn!(%user, raw, "malformed unlocked level, using default");
            LevelId::FIRST
        }
    }
}

fn decode_last_completed(user: &Username, raw: Option<&str>) -> Option<LevelId> {
    let raw = raw?;
    let level = parse_int(raw).and_then(|value| LevelId::try_from(value).ok());
    if level.is_none() {
        warn!(%user, raw, "discarding invalid last completed level");
    }
    level
}

fn decode_stars(user: &Username, raw: Option<&str>) -> BTreeMap<LevelId, StarRating> {
    let Some(raw) = raw else {
        return BTreeMap::new();
    };
    let Ok(entries) = serde_json::from_str::<BTreeMap<String, serde_json::Value>>(raw) else {
        warn!(%user, raw, "malformed level stars, using default");
        return BTreeMap::new();
    };

    entries
        .into_iter()
        .filter_map(|(level, stars)| {
            let level = level.parse::<LevelId>().ok()?;
            let stars = stars.as_u64()?;
            let stars = u8::try_from(stars).unwrap_or(StarRating::MAX);
            Some((level, StarRating::new(stars)))
        })
        .collect()
}

fn decode_coins(user: &Username, raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    match serde_json::from_str::<u64>(raw.trim()) {
        Ok(coins) => coins,
        Err(_) => {
            warn!(%user, raw, "malformed coin total, using default");
            0
        }
    }
}
