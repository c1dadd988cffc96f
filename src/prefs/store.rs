use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Key/value contract for persisted settings.
///
/// Writes must be visible to the next read (and durable before it, for
/// persistent implementations). Implementations never fail the caller:
/// a store that cannot persist logs and keeps the value in memory.
pub trait PreferenceStore: Send + Sync + 'static {
    /// Returns the boolean stored under `key`, or `default`.
    fn get_bool(&self, key: &str, default: bool) -> bool;

    /// Returns the integer stored under `key`, or `default`.
    fn get_long(&self, key: &str, default: i64) -> i64;

    /// Stores a boolean.
    fn set_bool(&self, key: &str, value: bool);

    /// Stores an integer.
    fn set_long(&self, key: &str, value: i64);
}

/// A single stored value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Long(i64),
}

/// In-memory [`PreferenceStore`].
///
/// Values of the wrong type read as the default.
#[derive(Default, Debug)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, PrefValue>>,
}

impl MemoryPreferences {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `values`.
    pub fn with_values(values: HashMap<String, PrefValue>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    /// Copy of every stored value.
    pub fn snapshot(&self) -> HashMap<String, PrefValue> {
        self.values.read().clone()
    }

    fn put(&self, key: &str, value: PrefValue) {
        self.values.write().insert(key.to_string(), value);
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.read().get(key) {
            Some(PrefValue::Bool(v)) => *v,
            _ => default,
        }
    }

    fn get_long(&self, key: &str, default: i64) -> i64 {
        match self.values.read().get(key) {
            Some(PrefValue::Long(v)) => *v,
            _ => default,
        }
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.put(key, PrefValue::Bool(value));
    }

    fn set_long(&self, key: &str, value: i64) {
        self.put(key, PrefValue::Long(value));
    }
}
