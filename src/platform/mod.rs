//! External collaborators, consumed through narrow traits.
//!
//! The supervisor never talks to the OS, the execution engine or the radio
//! library directly; hosts plug implementations of these traits into
//! [`Platform`] and hand it to the [`SupervisorBuilder`](crate::SupervisorBuilder).
//!
//! ## Contents
//! - [`ExecutionEngine`] / [`Execution`]: resolve and run the task's entry point
//! - [`AdapterFactory`] / [`AdapterClient`]: the radio adapter library
//! - [`HardwareSignals`]: OS radio/location state notifications
//! - [`NotificationSurface`]: OS notification rendering
//! - [`WakeScheduler`]: one-shot keyed alarms (with [`TokioAlarm`] provided)

use std::sync::Arc;

mod adapter;
mod alarm;
mod engine;
mod signals;
mod surface;

pub use adapter::{
    AdapterClient, AdapterFactory, AdapterState, CharacteristicAddress, CharacteristicInfo,
    CharacteristicUpdate, ClientOptions, ConnectOptions, ConnectionState, ConnectionStateEvent,
    DescriptorAddress, EventCallback, LogLevel, RestoreCallback, ScanFilter, ScanResult,
    ServiceInfo, StateCallback,
};
pub use alarm::{AlarmId, TokioAlarm, WakeScheduler};
pub use engine::{EntryPoint, Execution, ExecutionEngine, LaunchOptions};
pub use signals::{HardwareSignals, RawSignal, SignalListener, SignalSubscription, radio_codes};
pub use surface::{ChannelImportance, ChannelSpec, NotificationSurface};

use crate::prefs::PreferenceStore;

/// Bundle of host-provided collaborators.
#[derive(Clone)]
pub struct Platform {
    /// Persisted settings.
    pub prefs: Arc<dyn PreferenceStore>,
    /// Runs the background task.
    pub engine: Arc<dyn ExecutionEngine>,
    /// Creates radio adapter clients.
    pub adapter: Arc<dyn AdapterFactory>,
    /// Radio/location state notifications.
    pub signals: Arc<dyn HardwareSignals>,
    /// Persistent notification rendering.
    pub surface: Arc<dyn NotificationSurface>,
    /// Deferred wake-ups.
    pub alarm: Arc<dyn WakeScheduler>,
}
