//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the supervisor runtime.
//!
//! Config is consumed once, by `Supervisor::builder(config, platform)`.
//! Persisted, user-controlled settings (callback handle, foreground flag,
//! auto-start, manual stop) are **not** part of it: they live in the
//! [`PreferenceStore`](crate::prefs::PreferenceStore).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` / `relay_capacity = 0` → clamped to 1
//! - `watchdog = false` → only crash recovery arms the restart alarm
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use bgvisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.restart.delay = Duration::from_secs(10);
//! cfg.watchdog = false;
//!
//! assert_eq!(cfg.notification.id, 99778);
//! assert_eq!(cfg.bus_capacity_clamped(), 1024);
//! ```

use crate::policies::RestartPolicy;

/// Global configuration for the supervisor runtime.
///
/// ## Field semantics
/// - `restart`: delay and idle behavior of the restart alarm
/// - `watchdog`: re-arm the restart alarm on every start/wake
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `relay_capacity`: buffer of the `sendData` relay (min 1)
/// - `notification`: identifiers and default text of the persistent notification
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Restart alarm policy.
    pub restart: RestartPolicy,

    /// Periodic watchdog.
    ///
    /// When enabled, every start attempt and every fired wake re-arms the
    /// restart alarm, so a task killed silently (no termination callback) is
    /// still brought back.
    pub watchdog: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,

    /// Capacity of the local `sendData` relay.
    pub relay_capacity: usize,

    /// Persistent notification settings.
    pub notification: NotificationConfig,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    ///
    /// The `Bus` should use this value to avoid constructing an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a relay capacity clamped to a minimum of 1.
    #[inline]
    pub fn relay_capacity_clamped(&self) -> usize {
        self.relay_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `restart = RestartPolicy::default()` (5s, allowed while idle)
    /// - `watchdog = true`
    /// - `bus_capacity = 1024` (good baseline)
    /// - `relay_capacity = 64`
    /// - `notification = NotificationConfig::default()`
    fn default() -> Self {
        Self {
            restart: RestartPolicy::default(),
            watchdog: true,
            bus_capacity: 1024,
            relay_capacity: 64,
            notification: NotificationConfig::default(),
        }
    }
}

/// Persistent notification settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Fixed notification identifier; repeated renders update in place.
    pub id: u32,
    /// Notification channel identifier.
    pub channel_id: String,
    /// User-visible channel name.
    pub channel_name: String,
    /// Title used when the surface reports no application label.
    pub default_title: String,
    /// Initial body text.
    pub default_content: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            id: 99778,
            channel_id: "CHANNEL_DEFAULT".to_string(),
            channel_name: "Background service".to_string(),
            default_title: "Background service".to_string(),
            default_content: "Running in background".to_string(),
        }
    }
}
