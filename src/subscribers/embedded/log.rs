//! # LogWriter: lifecycle events as `tracing` records
//!
//! A minimal subscriber that forwards incoming [`Event`]s to `tracing` under the
//! `bgvisor::events` target. Install any `tracing` subscriber to see them.
//!
//! ## Example output
//! ```text
//! INFO bgvisor::events: [task-started] seq=4 handle=Some(42)
//! WARN bgvisor::events: [unexpected-termination] seq=7
//! INFO bgvisor::events: [restart-scheduled] seq=8 delay_ms=Some(5000) reason=Some("unexpected_termination")
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let seq = e.seq;
        match e.kind {
            EventKind::StartRequested => {
                debug!(target: "bgvisor::events", "[start-requested] seq={seq}");
            }
            EventKind::TaskStarted => {
                info!(target: "bgvisor::events", "[task-started] seq={seq} handle={:?}", e.handle);
            }
            EventKind::StartAborted => {
                warn!(
                    target: "bgvisor::events",
                    "[start-aborted] seq={seq} handle={:?} reason={:?}", e.handle, e.reason
                );
            }
            EventKind::StopRequested => {
                info!(target: "bgvisor::events", "[stop-requested] seq={seq} manual={:?}", e.manual);
            }
            EventKind::TaskStopped => {
                info!(target: "bgvisor::events", "[task-stopped] seq={seq}");
            }
            EventKind::UnexpectedTermination => {
                warn!(target: "bgvisor::events", "[unexpected-termination] seq={seq}");
            }
            EventKind::BootCompleted => {
                info!(target: "bgvisor::events", "[boot-completed] seq={seq} reason={:?}", e.reason);
            }
            EventKind::ShutdownRequested => {
                info!(target: "bgvisor::events", "[shutdown-requested] seq={seq}");
            }
            EventKind::RestartScheduled => {
                info!(
                    target: "bgvisor::events",
                    "[restart-scheduled] seq={seq} delay_ms={:?} reason={:?}", e.delay_ms, e.reason
                );
            }
            EventKind::RestartCancelled => {
                info!(target: "bgvisor::events", "[restart-cancelled] seq={seq}");
            }
            EventKind::WakeFired => {
                debug!(target: "bgvisor::events", "[wake-fired] seq={seq}");
            }
            EventKind::HardwareChanged => {
                info!(
                    target: "bgvisor::events",
                    "[hardware-changed] seq={seq} signal={:?} status={:?}", e.reason, e.hardware
                );
            }
            EventKind::NotificationShown => {
                debug!(
                    target: "bgvisor::events",
                    "[notification-shown] seq={seq} tap={:?} status={:?}", e.reason, e.hardware
                );
            }
            EventKind::NotificationWithdrawn => {
                debug!(target: "bgvisor::events", "[notification-withdrawn] seq={seq}");
            }
            EventKind::ClientCreated => {
                info!(target: "bgvisor::events", "[client-created] seq={seq}");
            }
            EventKind::ClientDestroyed => {
                info!(target: "bgvisor::events", "[client-destroyed] seq={seq}");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "bgvisor::events", "[subscriber-overflow] seq={seq} {:?}", e.reason);
            }
            EventKind::SubscriberPanicked => {
                warn!(
                    target: "bgvisor::events",
                    "[subscriber-panicked] {}",
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
