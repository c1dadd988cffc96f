use std::fmt;

use crate::error::SupervisorError;

/// Lifecycle state of the background task.
///
/// ```text
/// Idle ──► Starting ──► Running ──► Stopping ──► Idle
///   ▲          │           │
///   └──abort───┘           └─unexpected termination─► AwaitingRestart ──wake──► Starting
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ServiceState {
    #[default]
    Idle,
    Starting,
    Running,
    Stopping,
    AwaitingRestart,
}

impl ServiceState {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceState::Idle => "idle",
            ServiceState::Starting => "starting",
            ServiceState::Running => "running",
            ServiceState::Stopping => "stopping",
            ServiceState::AwaitingRestart => "awaiting_restart",
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a start attempt.
///
/// Start failures are recovered locally (the supervisor returns to `Idle` and
/// waits for the next trigger), so they are reported here rather than as `Err`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new execution context is running.
    Started,
    /// A context is already starting or running; nothing was done.
    AlreadyRunning,
    /// The attempt was abandoned.
    Aborted(SupervisorError),
}

impl StartOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, StartOutcome::Started)
    }
}
