//! File-backed key-value state store.
//!
//! Holds what a browser would keep in local storage: the auth token, the
//! current tenant id, the user-preferences object, and saved prompts — all
//! under fixed string keys ([`atrium_core::defaults`]). Every write persists
//! the full map to disk. There is no cross-process locking: concurrent
//! writers race and the last write wins, matching the single-writer-per-tab
//! model this store was designed for.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use atrium_core::defaults::STATE_FILE;
use atrium_core::{Error, Result};

/// Persistent key-value store for console state.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    values: HashMap<String, JsonValue>,
}

impl StateStore {
    /// Open (or create) the store inside `dir`.
    ///
    /// A corrupt state file is treated as empty rather than fatal: losing
    /// local preferences must never block the console from starting.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(STATE_FILE);

        let values = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt state file, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = values.len(), "state store opened");
        Ok(Self { path, values })
    }

    /// Open the store from `ATRIUM_STATE_DIR`, falling back to
    /// `$HOME/.atrium`.
    pub fn from_env() -> Result<Self> {
        let dir = std::env::var("ATRIUM_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".atrium")
            });
        Self::open(dir)
    }

    /// Read a raw value.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    /// Read and deserialize a value. A missing key yields `None`; a value
    /// of the wrong shape is an error.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.values.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Read a string value. Non-string values yield `None`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .map(String::from)
    }

    /// Write a value and persist the store.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.values
            .insert(key.to_string(), serde_json::to_value(value)?);
        self.persist()
    }

    /// Remove a key (if present) and persist the store.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    /// True when the key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    // Write-through via temp file + rename so a crash mid-write never
    // leaves a truncated state file.
    fn persist(&self) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&self.values)?;
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            Error::Store(format!(
                "failed to persist state to {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::defaults::{KEY_AUTH_TOKEN, KEY_TENANT_ID};
    use tempfile::TempDir;

    #[test]
    fn test_set_get_roundtrip_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = StateStore::open(dir.path()).unwrap();
            store.set(KEY_AUTH_TOKEN, &"tok-123").unwrap();
            store.set(KEY_TENANT_ID, &"t-1").unwrap();
        }
        let store = StateStore::open(dir.path()).unwrap();
        assert_eq!(store.get_string(KEY_AUTH_TOKEN).as_deref(), Some("tok-123"));
        assert_eq!(store.get_string(KEY_TENANT_ID).as_deref(), Some("t-1"));
    }

    #[test]
    fn test_remove_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = StateStore::open(dir.path()).unwrap();
        store.set(KEY_AUTH_TOKEN, &"tok").unwrap();
        store.remove(KEY_AUTH_TOKEN).unwrap();
        drop(store);

        let store = StateStore::open(dir.path()).unwrap();
        assert!(!store.contains(KEY_AUTH_TOKEN));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STATE_FILE), b"{not json").unwrap();
        let store = StateStore::open(dir.path()).unwrap();
        assert!(!store.contains(KEY_AUTH_TOKEN));
    }

    #[test]
    fn test_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let mut a = StateStore::open(dir.path()).unwrap();
        let mut b = StateStore::open(dir.path()).unwrap();
        a.set(KEY_TENANT_ID, &"from-a").unwrap();
        b.set(KEY_TENANT_ID, &"from-b").unwrap();

        let fresh = StateStore::open(dir.path()).unwrap();
        assert_eq!(fresh.get_string(KEY_TENANT_ID).as_deref(), Some("from-b"));
    }
}
