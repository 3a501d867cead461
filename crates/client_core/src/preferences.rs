//! Display preferences persisted independently of the conversation.

use shared::domain::{Preferences, Theme};
use storage::{KeyValueStore, HIGH_CONTRAST_KEY, THEME_KEY};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferenceStore {
    current: Preferences,
}

impl PreferenceStore {
    /// Reads both toggles once and writes the normalized values back.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let current = Preferences {
            theme: Theme::from_stored(store.get(THEME_KEY).as_deref()),
            high_contrast: store.get(HIGH_CONTRAST_KEY).as_deref() == Some("true"),
        };
        debug!(
            theme = current.theme.as_stored(),
            high_contrast = current.high_contrast,
            "loaded display preferences"
        );
        let prefs = Self { current };
        prefs.persist_theme(store);
        prefs.persist_high_contrast(store);
        prefs
    }

    pub fn current(&self) -> Preferences {
        self.current
    }

    pub fn theme(&self) -> Theme {
        self.current.theme
    }

    pub fn high_contrast(&self) -> bool {
        self.current.high_contrast
    }

    pub fn toggle_theme(&mut self, store: &dyn KeyValueStore) -> Theme {
        self.current.theme = self.current.theme.toggled();
        self.persist_theme(store);
        self.current.theme
    }

    pub fn toggle_high_contrast(&mut self, store: &dyn KeyValueStore) -> bool {
        self.current.high_contrast = !self.current.high_contrast;
        self.persist_high_contrast(store);
        self.current.high_contrast
    }

    fn persist_theme(&self, store: &dyn KeyValueStore) {
        if let Err(err) = store.set(THEME_KEY, self.current.theme.as_stored()) {
            warn!("failed to persist theme preference: {err}");
        }
    }

    fn persist_high_contrast(&self, store: &dyn KeyValueStore) {
        let value = if self.current.high_contrast {
            "true"
        } else {
            "false"
        };
        if let Err(err) = store.set(HIGH_CONTRAST_KEY, value) {
            warn!("failed to persist contrast preference: {err}");
        }
    }
}
