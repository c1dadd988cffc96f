//! # Supervisor: owns the background task lifecycle.
//!
//! The [`Supervisor`] owns the event bus, a [`SubscriberSet`], the hardware
//! monitor, the notification policy and the single [`TaskExecutionContext`].
//! Host lifecycle callbacks (start command, termination, boot, alarm wake) map
//! one-to-one onto its `on_*` methods.
//!
//! ## Key responsibilities
//! - idempotent start guarded by an atomic compare-and-set
//! - restart scheduling on unexpected termination (suppressed after a manual stop)
//! - watchdog re-arming on every start attempt and wake
//! - ordered, synchronous teardown
//! - request dispatch to the router of the live context
//!
//! ## High-level architecture
//! ```text
//! Host callbacks:
//!   start command  ──► on_start_requested()
//!   task died      ──► on_unexpected_termination() ──► alarm(111, 5s) ─┐
//!   boot completed ──► on_boot_completed()                             │
//!   alarm fired    ──► on_wake() ◄── Supervisor::run ◄── wakes ◄───────┘
//!
//! on_start_requested:
//!   watchdog? ──► alarm(111)
//!   running.compare_exchange(false, true) ── fail ──► AlreadyRunning
//!   clear manual-stop flag, Starting
//!   ServiceConfig::load ── no handle ──► Aborted(ConfigMissing), Idle
//!   engine.resolve ── none ──► Aborted(ResolutionFailed), Idle
//!   engine.start ── link not ready ──► Aborted(TransientLinkFailure), Idle
//!   CommandRouter::new, HardwareMonitor::attach, NotificationPolicy::refresh
//!   Running
//!
//! Event flow:
//!   Supervisor / NotificationPolicy / CommandRouter ── publish(Event) ──► Bus
//!        ──► subscriber listener (spawned by the builder) ──► SubscriberSet::emit(&Event)
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use bgvisor::{Config, Platform, Supervisor, TokioAlarm};
//!
//! # fn platform(alarm: TokioAlarm) -> Platform { unimplemented!() }
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> std::io::Result<()> {
//!     let (alarm, wakes) = TokioAlarm::new(tokio::runtime::Handle::current());
//!     let sup = Supervisor::builder(Config::default(), platform(alarm)).build();
//!
//!     sup.set_callback_dispatcher(42, true, true);
//!     sup.on_start_requested();
//!     sup.run(wakes).await
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::core::{
    config::Config,
    context::TaskExecutionContext,
    shutdown,
    state::{ServiceState, StartOutcome},
};
use crate::error::{EngineError, SupervisorError};
use crate::events::{Bus, Event, EventKind};
use crate::hardware::{HardwareChange, HardwareMonitor, HardwareStatus, Signal};
use crate::notification::NotificationPolicy;
use crate::platform::{AdapterState, AlarmId, Execution, LaunchOptions, Platform};
use crate::policies::RESTART_ALARM_ID;
use crate::prefs::{ServiceConfig, keys};
use crate::relay::Relay;
use crate::router::{CommandRouter, Request, Response, RouterParts, ServiceControl};
use crate::streams::EventStreams;
use crate::subscribers::SubscriberSet;

/// Method used to push hardware changes to the running task.
const DELIVER_METHOD: &str = "onReceiveData";

/// Coordinates the background task, its surfaces and event delivery.
pub struct Supervisor {
    cfg: Config,
    platform: Platform,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    hardware: Arc<HardwareMonitor>,
    notification: Arc<NotificationPolicy>,
    streams: Arc<EventStreams>,
    relay: Relay,
    running: AtomicBool,
    state: Mutex<ServiceState>,
    context: Mutex<Option<TaskExecutionContext>>,
    this: Weak<Supervisor>,
}

impl Supervisor {
    /// Internal constructor used by the builder.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_internal(
        cfg: Config,
        platform: Platform,
        bus: Bus,
        subs: Arc<SubscriberSet>,
        hardware: Arc<HardwareMonitor>,
        notification: Arc<NotificationPolicy>,
        streams: Arc<EventStreams>,
        relay: Relay,
        this: Weak<Supervisor>,
    ) -> Self {
        Self {
            cfg,
            platform,
            bus,
            subs,
            hardware,
            notification,
            streams,
            relay,
            running: AtomicBool::new(false),
            state: Mutex::new(ServiceState::Idle),
            context: Mutex::new(None),
            this,
        }
    }

    // ---- host lifecycle ----

    /// Starts the task unless it is already starting or running.
    pub fn on_start_requested(&self) -> StartOutcome {
        if self.cfg.watchdog {
            self.arm_restart("watchdog");
        }

        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(state = %self.state(), "start ignored: already running");
            return StartOutcome::AlreadyRunning;
        }

        self.bus.publish(Event::new(EventKind::StartRequested));
        let prefs = self.platform.prefs.as_ref();
        prefs.set_bool(keys::IS_MANUALLY_STOPPED, false);
        self.set_state(ServiceState::Starting);

        let config = ServiceConfig::load(prefs);
        let Some(handle) = config.callback_handle else {
            return self.abort_start(SupervisorError::ConfigMissing, None);
        };

        let Some(entry) = self.platform.engine.resolve(handle) else {
            let err = SupervisorError::ResolutionFailed {
                handle,
                reason: "unknown callback handle".to_string(),
            };
            return self.abort_start(err, Some(handle));
        };

        let launch = LaunchOptions {
            is_foreground: config.is_foreground,
        };
        let execution: Arc<dyn Execution> =
            match self.platform.engine.start(&entry, launch) {
                Ok(execution) => Arc::from(execution),
                Err(EngineError::LinkNotReady(reason)) => {
                    let err = SupervisorError::TransientLinkFailure { reason };
                    return self.abort_start(err, Some(handle));
                }
                Err(e) => {
                    let err = SupervisorError::ResolutionFailed {
                        handle,
                        reason: e.to_string(),
                    };
                    return self.abort_start(err, Some(handle));
                }
            };

        let router = Arc::new(CommandRouter::new(RouterParts {
            adapter: Arc::clone(&self.platform.adapter),
            prefs: Arc::clone(&self.platform.prefs),
            notification: Arc::clone(&self.notification),
            streams: Arc::clone(&self.streams),
            relay: self.relay.clone(),
            control: self.this.clone(),
            bus: self.bus.clone(),
        }));

        let live = Arc::new(AtomicBool::new(true));
        let initial = self
            .hardware
            .attach(self.hardware_listener(Arc::clone(&execution), Arc::clone(&live)));
        self.notification.refresh();

        *self.context.lock() = Some(TaskExecutionContext {
            entry,
            execution,
            router,
            live,
        });
        self.set_state(ServiceState::Running);
        info!(handle, ?initial, "background task started");
        self.bus.publish(
            Event::new(EventKind::TaskStarted)
                .with_handle(handle)
                .with_hardware(initial),
        );
        StartOutcome::Started
    }

    /// The host reports that the task died without a stop request.
    ///
    /// Returns `true` if a restart was scheduled. A report while nothing is
    /// running (already stopped, or never started) changes nothing.
    pub fn on_unexpected_termination(&self) -> bool {
        let was_running = self.state() == ServiceState::Running;
        warn!("background task terminated unexpectedly");
        self.bus.publish(Event::new(EventKind::UnexpectedTermination));
        if !self.teardown_context() && !was_running {
            debug!(state = %self.state(), "no live context; restart not scheduled");
            return false;
        }

        let prefs = self.platform.prefs.as_ref();
        if ServiceConfig::load(prefs).is_manually_stopped {
            info!("manually stopped; not restarting");
            self.set_state(ServiceState::Idle);
            return false;
        }

        self.arm_restart("unexpected_termination");
        self.set_state(ServiceState::AwaitingRestart);
        true
    }

    /// Stops the task. Manual stops persist the flag and cancel the pending restart.
    pub fn on_stop_requested(&self, manual: bool) {
        info!(manual, "stop requested");
        self.bus
            .publish(Event::new(EventKind::StopRequested).with_manual(manual));
        self.set_state(ServiceState::Stopping);

        if manual {
            self.platform.prefs.set_bool(keys::IS_MANUALLY_STOPPED, true);
            self.platform.alarm.cancel(RESTART_ALARM_ID);
            self.bus.publish(Event::new(EventKind::RestartCancelled));
        }

        self.teardown_context();
        self.set_state(ServiceState::Idle);
    }

    /// Boot completion: starts the task when auto-start is on and no manual stop is recorded.
    pub fn on_boot_completed(&self) -> Option<StartOutcome> {
        let config = ServiceConfig::load(self.platform.prefs.as_ref());
        if !config.auto_start_on_boot || config.is_manually_stopped {
            debug!(?config, "boot completed; auto-start skipped");
            self.bus
                .publish(Event::new(EventKind::BootCompleted).with_reason("skipped"));
            return None;
        }
        self.bus
            .publish(Event::new(EventKind::BootCompleted).with_reason("auto_start"));
        Some(self.on_start_requested())
    }

    /// The restart alarm fired.
    pub fn on_wake(&self) -> Option<StartOutcome> {
        self.bus.publish(Event::new(EventKind::WakeFired));
        if ServiceConfig::load(self.platform.prefs.as_ref()).is_manually_stopped {
            debug!("wake ignored: manually stopped");
            return None;
        }
        Some(self.on_start_requested())
    }

    // ---- foreground-facing API ----

    /// Persists handle, foreground mode and auto-start in one call.
    pub fn set_callback_dispatcher(&self, handle: i64, is_foreground: bool, auto_start: bool) {
        ServiceConfig::store_dispatcher(
            self.platform.prefs.as_ref(),
            handle,
            is_foreground,
            auto_start,
        );
    }

    /// Routes `request` to the router of the live context.
    pub fn dispatch(&self, request: &Request) -> Response {
        // clone out so a stopService can tear the context down
        let router = self.context.lock().as_ref().map(|c| Arc::clone(&c.router));
        match router {
            Some(router) => router.dispatch(request),
            None => SupervisorError::TaskNotRunning.into(),
        }
    }

    pub fn state(&self) -> ServiceState {
        *self.state.lock()
    }

    /// True while a context is starting or running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// True while the engine reports the task's code as executing.
    pub fn is_task_executing(&self) -> bool {
        self.context
            .lock()
            .as_ref()
            .is_some_and(|c| c.execution.is_executing())
    }

    /// Latest hardware status.
    pub fn hardware_status(&self) -> HardwareStatus {
        self.hardware.current()
    }

    /// Event channels shared by every context.
    pub fn streams(&self) -> &Arc<EventStreams> {
        &self.streams
    }

    /// Listener for `sendData` payloads.
    pub fn subscribe_data(&self) -> broadcast::Receiver<serde_json::Value> {
        self.relay.subscribe()
    }

    /// Number of subscribers receiving lifecycle events.
    pub fn subscriber_count(&self) -> usize {
        self.subs.len()
    }

    /// Lifecycle event bus.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn notification(&self) -> &NotificationPolicy {
        &self.notification
    }

    // ---- run loop ----

    /// Drives fired alarms until the wake channel closes or a termination signal arrives.
    ///
    /// On a termination signal the
    /// task is stopped (supervisor-initiated, restarts not suppressed) and every
    /// event channel is completed.
    pub async fn run(self: Arc<Self>, mut wakes: mpsc::UnboundedReceiver<AlarmId>) -> std::io::Result<()> {
        let shutdown = shutdown::wait_for_shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                res = &mut shutdown => {
                    res?;
                    self.bus.publish(Event::new(EventKind::ShutdownRequested));
                    self.on_stop_requested(false);
                    self.streams.complete_all();
                    return Ok(());
                }
                id = wakes.recv() => match id {
                    Some(RESTART_ALARM_ID) => {
                        self.on_wake();
                    }
                    Some(other) => debug!(id = other, "ignoring unknown alarm"),
                    None => return Ok(()),
                }
            }
        }
    }

    // ---- internals ----

    fn set_state(&self, state: ServiceState) {
        *self.state.lock() = state;
    }

    fn arm_restart(&self, reason: &'static str) {
        let policy = self.cfg.restart;
        self.platform
            .alarm
            .schedule(RESTART_ALARM_ID, policy.delay, policy.allow_while_idle);
        self.bus.publish(
            Event::new(EventKind::RestartScheduled)
                .with_delay(policy.delay)
                .with_reason(reason),
        );
    }

    fn abort_start(&self, err: SupervisorError, handle: Option<i64>) -> StartOutcome {
        if err.is_transient() {
            info!(error = %err, "start deferred until next wake");
        } else {
            warn!(error = %err, "start aborted");
        }
        let mut ev = Event::new(EventKind::StartAborted).with_reason(err.as_label());
        if let Some(handle) = handle {
            ev = ev.with_handle(handle);
        }
        self.bus.publish(ev);

        self.set_state(ServiceState::Idle);
        self.running.store(false, Ordering::Release);
        StartOutcome::Aborted(err)
    }

    /// Returns `true` if a live context was torn down.
    fn teardown_context(&self) -> bool {
        let Some(ctx) = self.context.lock().take() else {
            return false;
        };
        ctx.teardown(&self.hardware, &self.notification);
        self.running.store(false, Ordering::Release);
        self.bus.publish(Event::new(EventKind::TaskStopped));
        true
    }

    /// Fans a normalized hardware change out to the notification, the
    /// adapter-state channel (radio only) and the running task.
    ///
    /// Does nothing once the owning context has started tearing down.
    fn hardware_listener(
        &self,
        execution: Arc<dyn Execution>,
        live: Arc<AtomicBool>,
    ) -> crate::hardware::ChangeListener {
        let notification = Arc::clone(&self.notification);
        let streams = Arc::clone(&self.streams);
        let bus = self.bus.clone();
        Arc::new(move |change: HardwareChange| {
            if !live.load(Ordering::Acquire) {
                debug!(signal = change.signal.as_str(), "hardware change after teardown ignored");
                return;
            }
            let state = AdapterState::from(change.enabled);
            debug!(signal = change.signal.as_str(), %state, "hardware changed");

            notification.refresh();
            if change.signal == Signal::Radio {
                streams.adapter_state.publish(state);
            }
            execution.deliver(
                DELIVER_METHOD,
                json!({ "signal": change.signal.as_str(), "state": state.as_str() }),
            );
            bus.publish(
                Event::new(EventKind::HardwareChanged)
                    .with_hardware(change.status)
                    .with_reason(change.signal.as_str()),
            );
        })
    }
}

impl ServiceControl for Supervisor {
    fn request_stop(&self, manual: bool) {
        self.on_stop_requested(manual);
    }
}
