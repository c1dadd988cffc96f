use std::sync::{Arc, Weak};

use tokio::sync::broadcast;

use crate::{
    core::{Config, Supervisor},
    events::Bus,
    hardware::HardwareMonitor,
    notification::NotificationPolicy,
    platform::Platform,
    relay::Relay,
    streams::EventStreams,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Supervisor`] with optional subscribers.
pub struct SupervisorBuilder {
    cfg: Config,
    platform: Platform,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration and host collaborators.
    pub fn new(cfg: Config, platform: Platform) -> Self {
        Self {
            cfg,
            platform,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events (start, stop, restart scheduling,
    /// hardware changes, ...) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds and returns the Supervisor instance.
    ///
    /// Must be called inside a tokio runtime (subscriber workers are spawned here).
    /// Initializes:
    /// - event bus, subscriber workers and the bus → subscriber listener, so
    ///   every event from here on reaches subscribers whether or not `run` is driven
    /// - hardware monitor (detached until the first start)
    /// - notification policy (registers the notification channel)
    /// - event channels and the `sendData` relay, shared by every task context
    pub fn build(self) -> Arc<Supervisor> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
        spawn_subscriber_listener(&bus, Arc::downgrade(&subs));

        let hardware = Arc::new(HardwareMonitor::new(Arc::clone(&self.platform.signals)));
        let notification = Arc::new(NotificationPolicy::new(
            self.cfg.notification.clone(),
            Arc::clone(&self.platform.surface),
            Arc::clone(&self.platform.prefs),
            Arc::clone(&hardware),
            bus.clone(),
        ));
        let streams = Arc::new(EventStreams::new());
        let relay = Relay::new(self.cfg.relay_capacity_clamped());

        Arc::new_cyclic(|this| {
            Supervisor::new_internal(
                self.cfg,
                self.platform,
                bus,
                subs,
                hardware,
                notification,
                streams,
                relay,
                this.clone(),
            )
        })
    }
}

/// Forwards bus events to the subscriber set (fire-and-forget).
///
/// Holds the set weakly; ends when the set is dropped or the bus closes.
fn spawn_subscriber_listener(bus: &Bus, set: Weak<SubscriberSet>) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => match set.upgrade() {
                    Some(set) => set.emit(&ev),
                    None => break,
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "subscriber listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

impl Supervisor {
    /// Starts building a supervisor.
    pub fn builder(cfg: Config, platform: Platform) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg, platform)
    }
}
