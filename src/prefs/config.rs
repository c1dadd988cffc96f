use super::store::PreferenceStore;

/// Persisted key names.
pub mod keys {
    pub const CALLBACK_HANDLE: &str = "callback_handle";
    pub const IS_FOREGROUND: &str = "is_foreground";
    pub const AUTO_START_ON_BOOT: &str = "auto_start_on_boot";
    pub const IS_MANUALLY_STOPPED: &str = "is_manually_stopped";
}

/// Typed snapshot of the persisted service settings.
///
/// Read by the supervisor on every start attempt; written by the foreground
/// side through [`ServiceConfig::store_dispatcher`] and the individual setters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Opaque entry-point handle; `None` when unset (stored as `0`).
    pub callback_handle: Option<i64>,
    /// Whether the persistent notification is shown.
    pub is_foreground: bool,
    /// Whether boot completion starts the task.
    pub auto_start_on_boot: bool,
    /// Set by a manual stop; suppresses restarts.
    pub is_manually_stopped: bool,
}

impl ServiceConfig {
    /// Reads all keys, applying the documented defaults.
    pub fn load(prefs: &dyn PreferenceStore) -> Self {
        let handle = prefs.get_long(keys::CALLBACK_HANDLE, 0);
        Self {
            callback_handle: (handle != 0).then_some(handle),
            is_foreground: is_foreground(prefs),
            auto_start_on_boot: prefs.get_bool(keys::AUTO_START_ON_BOOT, true),
            is_manually_stopped: is_manually_stopped(prefs),
        }
    }

    /// Persists handle, foreground mode and auto-start in one call.
    pub fn store_dispatcher(
        prefs: &dyn PreferenceStore,
        callback_handle: i64,
        is_foreground: bool,
        auto_start_on_boot: bool,
    ) {
        prefs.set_long(keys::CALLBACK_HANDLE, callback_handle);
        prefs.set_bool(keys::IS_FOREGROUND, is_foreground);
        prefs.set_bool(keys::AUTO_START_ON_BOOT, auto_start_on_boot);
    }
}

pub(crate) fn is_foreground(prefs: &dyn PreferenceStore) -> bool {
    prefs.get_bool(keys::IS_FOREGROUND, true)
}

pub(crate) fn is_manually_stopped(prefs: &dyn PreferenceStore) -> bool {
    prefs.get_bool(keys::IS_MANUALLY_STOPPED, false)
}
