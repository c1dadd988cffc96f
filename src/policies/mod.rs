//! Restart policy.
//!
//! ## Contents
//! - [`RestartPolicy`] delay and idle behavior of the restart alarm
//! - [`RESTART_ALARM_ID`] the single alarm identifier shared by crash recovery
//!   and the watchdog
//!
//! ## Quick wiring
//! ```text
//! Config { restart: RestartPolicy, watchdog: bool }
//!      └─► core::supervisor::Supervisor uses:
//!           - restart.delay / allow_while_idle when arming the alarm
//!           - watchdog to decide whether starts/wakes re-arm it
//! ```

mod restart;

pub use restart::{RESTART_ALARM_ID, RestartPolicy};
