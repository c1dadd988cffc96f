//! # Lifecycle events emitted by the supervisor and its components.
//!
//! The [`EventKind`] enum classifies events across four categories:
//! - **Lifecycle events**: start/stop/termination of the background task
//! - **Restart events**: scheduling and cancellation of deferred restarts
//! - **Surface events**: hardware changes and notification visibility
//! - **Subscriber events**: overflow/panic inside subscriber workers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, reasons,
//! restart delays and hardware snapshots.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use bgvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RestartScheduled)
//!     .with_reason("unexpected_termination")
//!     .with_delay(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::RestartScheduled);
//! assert_eq!(ev.delay_ms, Some(5_000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::hardware::HardwareStatus;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic info
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and cause
    SubscriberOverflow,

    // === Task lifecycle ===
    /// A start attempt passed the idempotent-start guard.
    StartRequested,

    /// Execution context created; the task is running.
    ///
    /// Sets:
    /// - `handle`: callback handle that was launched
    TaskStarted,

    /// Start attempt aborted; supervisor is back to `Idle`.
    ///
    /// Sets:
    /// - `reason`: error label (`config_missing`, `resolution_failed`, ...)
    /// - `handle`: callback handle, when one was read
    StartAborted,

    /// Stop requested.
    ///
    /// Sets:
    /// - `manual`: `true` for user-initiated stops
    StopRequested,

    /// Execution context torn down.
    TaskStopped,

    /// The host reported that the task died without a stop request.
    UnexpectedTermination,

    /// Boot completion observed.
    ///
    /// Sets:
    /// - `reason`: `auto_start` or `skipped`
    BootCompleted,

    /// OS termination signal observed by [`Supervisor::run`](crate::Supervisor::run).
    ShutdownRequested,

    // === Restart scheduling ===
    /// A deferred restart (or watchdog) alarm was armed.
    ///
    /// Sets:
    /// - `delay_ms`: delay before the wake
    /// - `reason`: `unexpected_termination` or `watchdog`
    RestartScheduled,

    /// The pending restart alarm was cancelled (manual stop).
    RestartCancelled,

    /// The restart alarm fired.
    WakeFired,

    // === Surfaces ===
    /// Normalized hardware change.
    ///
    /// Sets:
    /// - `hardware`: status after the change
    /// - `reason`: `radio` or `location`
    HardwareChanged,

    /// Persistent notification rendered or replaced.
    ///
    /// Sets:
    /// - `hardware`: status used for the render
    /// - `reason`: tap target
    NotificationShown,

    /// Persistent notification withdrawn.
    NotificationWithdrawn,

    /// Adapter client created.
    ClientCreated,

    /// Adapter client released.
    ClientDestroyed,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Human-readable reason (error labels, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Restart delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Whether a stop was user-initiated.
    pub manual: Option<bool>,
    /// Hardware snapshot.
    pub hardware: Option<HardwareStatus>,
    /// Callback handle involved.
    pub handle: Option<i64>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            reason: None,
            delay_ms: None,
            manual: None,
            hardware: None,
            handle: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a restart delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Marks the stop as manual or supervisor-initiated.
    #[inline]
    pub fn with_manual(mut self, manual: bool) -> Self {
        self.manual = Some(manual);
        self
    }

    /// Attaches a hardware snapshot.
    #[inline]
    pub fn with_hardware(mut self, status: HardwareStatus) -> Self {
        self.hardware = Some(status);
        self
    }

    /// Attaches a callback handle.
    #[inline]
    pub fn with_handle(mut self, handle: i64) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::StartRequested);
        let b = Event::new(EventKind::TaskStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn delay_saturates() {
        let ev = Event::new(EventKind::RestartScheduled).with_delay(Duration::from_secs(u64::MAX));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }
}
