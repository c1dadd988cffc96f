//! # Restart policy for the background task.
//!
//! [`RestartPolicy`] controls the one-shot alarm that brings the task back.
//!
//! Two triggers arm the same alarm:
//! ```text
//! unexpected termination (not manually stopped) ──┐
//!                                                 ├──► schedule(RESTART_ALARM_ID, delay)
//! start attempt / fired wake (watchdog enabled) ──┘
//! ```
//! Because both use [`RESTART_ALARM_ID`], any re-arm replaces the pending alarm
//! and at most one restart is ever in flight.

use std::time::Duration;

use crate::platform::AlarmId;

/// Identifier of the restart/watchdog alarm.
pub const RESTART_ALARM_ID: AlarmId = 111;

/// Policy controlling the deferred restart alarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestartPolicy {
    /// Delay between the trigger and the wake.
    pub delay: Duration,
    /// Fire even when the device is in an idle/doze state.
    pub allow_while_idle: bool,
}

impl RestartPolicy {
    /// Creates a policy with the given delay, allowed while idle.
    #[must_use]
    pub fn after(delay: Duration) -> Self {
        Self {
            delay,
            allow_while_idle: true,
        }
    }
}

impl Default for RestartPolicy {
    /// Returns a 5s delay, allowed while idle.
    fn default() -> Self {
        Self::after(Duration::from_secs(5))
    }
}
