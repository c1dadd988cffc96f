//! # sled-backed preference store.
//!
//! One sled tree; each key holds a JSON-encoded [`PrefValue`]. Every write is
//! flushed before it returns, so a value set before a kill is read back after it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PreferenceError;

use super::store::{PrefValue, PreferenceStore};

/// [`PreferenceStore`] persisted in a [`sled::Db`].
pub struct SledPreferences {
    path: PathBuf,
    db: sled::Db,
}

impl SledPreferences {
    /// Opens (or creates) the database directory at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let db = sled::open(&path)?;
        Ok(Self { path, db })
    }

    /// Location of the database directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self, key: &str) -> Result<Option<PrefValue>, PreferenceError> {
        match self.db.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn lookup(&self, key: &str) -> Option<PrefValue> {
        self.read(key).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), key, error = %e, "preference unreadable, using default");
            None
        })
    }

    fn persist(&self, key: &str, value: PrefValue) -> Result<(), PreferenceError> {
        let bytes = serde_json::to_vec(&value)?;
        self.db.insert(key, bytes)?;
        self.db.flush()?;
        Ok(())
    }

    fn write(&self, key: &str, value: PrefValue) {
        if let Err(e) = self.persist(key, value) {
            tracing::warn!(path = %self.path.display(), key, error = %e, "preference write not persisted");
        }
    }
}

impl fmt::Debug for SledPreferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SledPreferences")
            .field("path", &self.path)
            .field("len", &self.db.len())
            .finish()
    }
}

impl PreferenceStore for SledPreferences {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.lookup(key) {
            Some(PrefValue::Bool(v)) => v,
            _ => default,
        }
    }

    fn get_long(&self, key: &str, default: i64) -> i64 {
        match self.lookup(key) {
            Some(PrefValue::Long(v)) => v,
            _ => default,
        }
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.write(key, PrefValue::Bool(value));
    }

    fn set_long(&self, key: &str, value: i64) {
        self.write(key, PrefValue::Long(value));
    }
}
