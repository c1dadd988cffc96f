//! # bgvisor
//!
//! **bgvisor** supervises a single long-lived background task on a host that
//! may kill it at any time (mobile OS services, session daemons).
//!
//! It keeps the task alive across kills and reboots, mirrors radio/location
//! state into a persistent notification, and routes requests from the task to
//! a radio adapter client and to the service itself.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   host callbacks           foreground app               background task
//!  (start/kill/boot/alarm)  (setCallbackDispatcher)      (Request: method + args)
//!            │                       │                            │
//!            ▼                       ▼                            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                       │
//! │  - running guard (at most one TaskExecutionContext)               │
//! │  - restart / watchdog alarm (single id, WakeScheduler)            │
//! │  - HardwareMonitor ─► NotificationPolicy ─► NotificationSurface   │
//! │  - EventStreams + Relay (shared by every context)                 │
//! └──────┬──────────────────────────────┬─────────────────────────────┘
//!        ▼                              ▼
//! ┌──────────────────────┐    ┌──────────────────────────────────────┐
//! │ TaskExecutionContext │    │ CommandRouter                        │
//! │ - EntryPoint         │    │ - built-ins (stopService, sendData,  │
//! │ - Execution          │    │   createClient, setForegroundMode)   │
//! └──────────────────────┘    │ - CapabilityHandlers (priority list) │
//!                             └──────────────────────────────────────┘
//!        │ publish(Event)
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                  (capacity: Config::bus_capacity)                 │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       subscriber listener ─► SubscriberSet
//!                                           ┌─────────┼─────────┐
//!                                           ▼         ▼         ▼
//!                                        worker1  worker2  workerN
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──start──► Starting ──context built──► Running
//!   ▲                │ abort (no handle,           │
//!   │                │ unknown handle, link)       ├─ stop ──► Stopping ──► Idle
//!   └────────────────┘                             │
//!                                                  └─ killed ──► AwaitingRestart
//!                                                                  │ alarm(111, 5s)
//!                                                                  ▼
//!                                                            on_wake ──► start
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                          |
//! |-------------------|-------------------------------------------------------------|---------------------------------------------|
//! | **Supervision**   | Start guard, restart-on-kill, boot auto-start, watchdog.    | [`Supervisor`], [`RestartPolicy`]           |
//! | **Routing**       | Method dispatch to built-ins and capability handlers.       | [`CommandRouter`], [`Request`], [`Response`] |
//! | **Notification**  | Hardware-driven icon, text and tap target.                  | [`NotificationPolicy`], [`HardwareStatus`]  |
//! | **Streams**       | Single-listener event channels for adapter callbacks.       | [`EventStreams`], [`StreamChannel`]         |
//! | **Host contract** | Engine, adapter, signals, surface, alarms, preferences.     | [`Platform`], [`PreferenceStore`]           |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, ...).         | [`Subscribe`]                               |
//! | **Errors**        | Typed errors with stable labels.                            | [`SupervisorError`], [`AdapterError`]       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use bgvisor::{Config, Platform, Request, Supervisor, TokioAlarm};
//!
//! # fn host_platform(alarm: TokioAlarm) -> Platform { unimplemented!() }
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> std::io::Result<()> {
//!     let (alarm, wakes) = TokioAlarm::new(tokio::runtime::Handle::current());
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn bgvisor::Subscribe>> = vec![Arc::new(bgvisor::LogWriter::default())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn bgvisor::Subscribe>> = Vec::new();
//!
//!     let sup = Supervisor::builder(Config::default(), host_platform(alarm))
//!         .with_subscribers(subs)
//!         .build();
//!
//!     sup.set_callback_dispatcher(42, true, true);
//!     sup.on_start_requested();
//!     let _ = sup.dispatch(&Request::bare("createClient"));
//!
//!     sup.run(wakes).await
//! }
//! ```
mod core;
mod error;
mod events;
mod hardware;
mod notification;
mod policies;
mod relay;
mod router;
mod streams;
mod subscribers;

pub mod platform;
pub mod prefs;

#[cfg(test)]
mod testkit;

// ---- Public re-exports ----

pub use core::{Config, NotificationConfig, ServiceState, StartOutcome, Supervisor, SupervisorBuilder};
pub use error::{AdapterError, EngineError, PreferenceError, SupervisorError};
pub use events::{Bus, Event, EventKind};
pub use hardware::{HardwareChange, HardwareMonitor, HardwareStatus, Signal};
pub use notification::{
    NotificationContent, NotificationIcon, NotificationPolicy, NotificationText, TapTarget,
    compute_notification,
};
pub use platform::{Platform, TokioAlarm};
pub use policies::{RESTART_ALARM_ID, RestartPolicy};
pub use prefs::{MemoryPreferences, PreferenceStore, ServiceConfig, SledPreferences};
pub use relay::Relay;
pub use router::handlers::{CapabilityHandler, HandlerContext};
pub use router::{CommandRouter, Request, Response, RouterParts, ServiceControl, methods};
pub use streams::{EventStreams, StreamChannel, Subscription};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
