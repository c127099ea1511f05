//! User preferences persisted in the local state store.

use serde::{Deserialize, Serialize};
use tracing::warn;

use atrium_core::defaults::KEY_PREFERENCES;
use atrium_core::Result;

use crate::session::SharedStore;

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

/// Table density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    Comfortable,
    Compact,
}

/// User preferences object, stored as one JSON value under a fixed key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub language: String,
    pub notifications_enabled: bool,
    pub density: Density,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: "en".to_string(),
            notifications_enabled: true,
            density: Density::Comfortable,
        }
    }
}

impl Preferences {
    /// Load preferences from the store; defaults when absent or unreadable.
    pub fn load(store: &SharedStore) -> Self {
        let store = store.lock().expect("state store poisoned");
        match store.get_as::<Preferences>(KEY_PREFERENCES) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "unreadable preferences, using defaults");
                Self::default()
            }
        }
    }

    /// Persist preferences to the store.
    pub fn save(&self, store: &SharedStore) -> Result<()> {
        let mut store = store.lock().expect("state store poisoned");
        store.set(KEY_PREFERENCES, self)
    }
}
