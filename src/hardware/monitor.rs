use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::platform::{HardwareSignals, RawSignal, SignalSubscription, radio_codes};

use super::status::{AtomicHardwareStatus, HardwareStatus};

/// Which hardware signal changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Radio,
    Location,
}

impl Signal {
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Radio => "radio",
            Signal::Location => "location",
        }
    }
}

/// A normalized change: one signal flipped to `enabled`; `status` is the full picture after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HardwareChange {
    pub signal: Signal,
    pub enabled: bool,
    pub status: HardwareStatus,
}

/// Callback receiving normalized changes (runs on the OS delivery thread).
pub type ChangeListener = Arc<dyn Fn(HardwareChange) + Send + Sync>;

thread_local! {
    static IN_CALLBACK: Cell<bool> = const { Cell::new(false) };
}

/// Admission gate between OS callbacks and `detach`.
///
/// A callback runs only while its registration generation is current and holds
/// the read side for its whole duration; `detach` retires the generation and then
/// takes the write side, so it returns only after in-flight callbacks finished.
#[derive(Default)]
struct Gate {
    current: AtomicU64,
    next: AtomicU64,
    inflight: RwLock<()>,
}

impl Gate {
    fn open(&self) -> u64 {
        let generation = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        self.current.store(generation, Ordering::Release);
        generation
    }

    fn close(&self) {
        self.current.store(0, Ordering::Release);
        // a listener that detaches from its own callback cannot wait for itself
        if !IN_CALLBACK.with(Cell::get) {
            drop(self.inflight.write());
        }
    }

    fn run(&self, generation: u64, f: impl FnOnce()) {
        let _guard = self.inflight.read();
        if self.current.load(Ordering::Acquire) != generation {
            return;
        }
        let outer = IN_CALLBACK.with(|c| c.replace(true));
        f();
        IN_CALLBACK.with(|c| c.set(outer));
    }
}

/// Turns OS radio/location notifications into [`HardwareChange`]s.
///
/// ### Rules
/// - At most one OS registration at a time; `attach` replaces a previous one.
/// - `detach` removes the registration and waits for callbacks already running
///   on other threads; callbacks delivered after it (or still queued by the OS
///   for a stale registration) are ignored.
/// - Transitional radio codes (turning on/off) are ignored.
pub struct HardwareMonitor {
    signals: Arc<dyn HardwareSignals>,
    status: Arc<AtomicHardwareStatus>,
    subscription: Mutex<Option<SignalSubscription>>,
    gate: Arc<Gate>,
}

impl HardwareMonitor {
    pub fn new(signals: Arc<dyn HardwareSignals>) -> Self {
        Self {
            signals,
            status: Arc::new(AtomicHardwareStatus::default()),
            subscription: Mutex::new(None),
            gate: Arc::new(Gate::default()),
        }
    }

    /// Latest published status.
    pub fn current(&self) -> HardwareStatus {
        self.status.load()
    }

    /// Re-reads both signals from the OS and publishes the result.
    pub fn sample(&self) -> HardwareStatus {
        let status = HardwareStatus::new(
            self.signals.radio_enabled(),
            self.signals.location_enabled(),
        );
        self.status.store(status);
        status
    }

    /// True while an OS registration is held.
    pub fn is_attached(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Samples the current state and registers `listener` with the OS.
    pub fn attach(&self, listener: ChangeListener) -> HardwareStatus {
        let mut slot = self.subscription.lock();
        if let Some(previous) = slot.take() {
            tracing::warn!("hardware monitor attached twice; dropping previous registration");
            self.gate.close();
            self.signals.unsubscribe(previous);
        }

        let initial = self.sample();
        let generation = self.gate.open();
        let gate = Arc::clone(&self.gate);
        let signals = Arc::clone(&self.signals);
        let status = Arc::clone(&self.status);
        let on_raw = Arc::new(move |raw: RawSignal| {
            gate.run(generation, || {
                if let Some(change) = normalize(raw, signals.as_ref(), &status) {
                    listener(change);
                }
            });
        });
        *slot = Some(self.signals.subscribe(on_raw));
        tracing::debug!(?initial, "hardware monitor attached");
        initial
    }

    /// Removes the OS registration, if any.
    ///
    /// Returns once no callback of that registration is running on another thread.
    pub fn detach(&self) {
        let taken = self.subscription.lock().take();
        if let Some(subscription) = taken {
            self.gate.close();
            self.signals.unsubscribe(subscription);
            tracing::debug!("hardware monitor detached");
        }
    }
}

/// Maps a raw OS signal to a change and publishes it to `status`.
fn normalize(
    raw: RawSignal,
    signals: &dyn HardwareSignals,
    status: &AtomicHardwareStatus,
) -> Option<HardwareChange> {
    match raw {
        RawSignal::RadioState(code) => {
            let enabled = match code {
                radio_codes::STATE_ON => true,
                radio_codes::STATE_OFF => false,
                radio_codes::STATE_TURNING_ON | radio_codes::STATE_TURNING_OFF => {
                    tracing::debug!(code, "radio transitioning");
                    return None;
                }
                other => {
                    tracing::debug!(code = other, "unknown radio state code");
                    return None;
                }
            };
            Some(HardwareChange {
                signal: Signal::Radio,
                enabled,
                status: status.set_radio(enabled),
            })
        }
        RawSignal::LocationProvidersChanged => {
            let enabled = signals.location_enabled();
            Some(HardwareChange {
                signal: Signal::Location,
                enabled,
                status: status.set_location(enabled),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::FakeSignals;

    fn collect() -> (ChangeListener, Arc<Mutex<Vec<HardwareChange>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (Arc::new(move |c| sink.lock().push(c)), seen)
    }

    #[test]
    fn normalizes_radio_codes() {
        let signals = Arc::new(FakeSignals::new(false, true));
        let monitor = HardwareMonitor::new(signals.clone());
        let (listener, seen) = collect();

        assert_eq!(monitor.attach(listener), HardwareStatus::new(false, true));

        signals.emit(RawSignal::RadioState(radio_codes::STATE_TURNING_ON));
        signals.emit(RawSignal::RadioState(radio_codes::STATE_ON));

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].signal, Signal::Radio);
        assert!(seen[0].enabled);
        assert_eq!(seen[0].status, HardwareStatus::new(true, true));
        assert_eq!(monitor.current(), HardwareStatus::new(true, true));
    }

    #[test]
    fn location_change_queries_provider() {
        let signals = Arc::new(FakeSignals::new(true, true));
        let monitor = HardwareMonitor::new(signals.clone());
        let (listener, seen) = collect();
        monitor.attach(listener);

        signals.set_location(false);
        signals.emit(RawSignal::LocationProvidersChanged);

        let seen = seen.lock();
        assert_eq!(seen[0].signal, Signal::Location);
        assert!(!seen[0].enabled);
        assert_eq!(monitor.current(), HardwareStatus::new(true, false));
    }

    #[test]
    fn detach_unregisters() {
        let signals = Arc::new(FakeSignals::new(true, true));
        let monitor = HardwareMonitor::new(signals.clone());
        let (listener, seen) = collect();

        monitor.attach(listener.clone());
        monitor.attach(listener);
        assert_eq!(signals.listener_count(), 1);

        monitor.detach();
        assert!(!monitor.is_attached());
        assert_eq!(signals.listener_count(), 0);

        signals.emit(RawSignal::RadioState(radio_codes::STATE_OFF));
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn stale_registration_is_ignored_after_detach() {
        let signals = Arc::new(FakeSignals::new(true, true).retaining());
        let monitor = HardwareMonitor::new(signals.clone());
        let (first, seen_first) = collect();
        let (second, seen_second) = collect();

        monitor.attach(first);
        monitor.detach();
        monitor.attach(second);

        signals.emit_retained(RawSignal::RadioState(radio_codes::STATE_OFF));
        assert!(seen_first.lock().is_empty());
        assert_eq!(seen_second.lock().len(), 1);

        monitor.detach();
        signals.emit_retained(RawSignal::RadioState(radio_codes::STATE_ON));
        assert_eq!(seen_second.lock().len(), 1);
        assert_eq!(monitor.current(), HardwareStatus::new(false, true));
    }

    #[test]
    fn detach_waits_for_running_callback() {
        use std::sync::mpsc;
        use std::thread;
        use std::time::Duration;

        let signals = Arc::new(FakeSignals::new(true, true));
        let monitor = Arc::new(HardwareMonitor::new(signals.clone()));
        let (entered_tx, entered_rx) = mpsc::channel();
        let finished = Arc::new(Mutex::new(false));
        let done = Arc::clone(&finished);
        monitor.attach(Arc::new(move |_| {
            let _ = entered_tx.send(());
            thread::sleep(Duration::from_millis(50));
            *done.lock() = true;
        }));

        let os = {
            let signals = Arc::clone(&signals);
            thread::spawn(move || signals.emit(RawSignal::RadioState(radio_codes::STATE_OFF)))
        };
        entered_rx.recv().unwrap();
        monitor.detach();
        assert!(*finished.lock());
        os.join().unwrap();
    }

    #[test]
    fn detach_from_own_callback_does_not_block() {
        let signals = Arc::new(FakeSignals::new(true, true));
        let monitor = Arc::new(HardwareMonitor::new(signals.clone()));
        let weak = Arc::downgrade(&monitor);
        monitor.attach(Arc::new(move |_| {
            if let Some(monitor) = weak.upgrade() {
                monitor.detach();
            }
        }));

        signals.emit(RawSignal::RadioState(radio_codes::STATE_OFF));
        assert!(!monitor.is_attached());
    }
}
