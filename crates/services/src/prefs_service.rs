use std::sync::Arc;

use finlingo_core::model::{Theme, UserPrefs, Username};
use storage::keys;
use storage::repository::KeyValueStore;

use crate::error::PrefsServiceError;

#[derive(Clone)]
pub struct PrefsService {
    kv: Arc<dyn KeyValueStore>,
}

impl PrefsService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load persisted prefs (or defaults if missing or unrecognised).
    ///
    /// # Errors
    ///
    /// Returns `PrefsServiceError` on storage failures.
    pub async fn load(&self, user: &Username) -> Result<UserPrefs, PrefsServiceError> {
        let theme = self
            .kv
            .get(&keys::prefs_theme(user))
            .await?
            .map(|raw| Theme::from_stored(&raw))
            .unwrap_or_default();
        Ok(UserPrefs { theme })
    }

    /// # Errors
    ///
    /// Returns `PrefsServiceError` on storage failures.
    pub async fn set_theme(
        &self,
        user: &Username,
        theme: Theme,
    ) -> Result<UserPrefs, PrefsServiceError> {
        self.kv
            .put(&keys::prefs_theme(user), theme.as_str())
            .await?;
        Ok(UserPrefs { theme })
    }

    /// Drops every stored preference for the user.
    ///
    /// # Errors
    ///
    /// Returns `PrefsServiceError` on storage failures.
    pub async fn reset(&self, user: &Username) -> Result<(), PrefsServiceError> {
        self.kv.remove_prefix(&keys::prefs_prefix(user)).await?;
        Ok(())
    }
}
