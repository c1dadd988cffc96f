//! # One-shot keyed alarms.
//!
//! [`WakeScheduler`] is the contract the supervisor uses for deferred restarts.
//! [`TokioAlarm`] implements it with cancellable sleeps:
//!
//! ```text
//! schedule(id, delay)
//!   ├─► cancel previous token for `id` (if any)
//!   └─► spawn: select! { sleep(delay) ─► fired.send(id)
//!                        token.cancelled() ─► (dropped) }
//! ```
//!
//! ## Rules
//! - At most **one** pending alarm per id; scheduling again replaces it.
//! - Fired ids are delivered on the receiver returned by [`TokioAlarm::new`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::{runtime::Handle, select, sync::mpsc, time};
use tokio_util::sync::CancellationToken;

/// Identifier of a keyed alarm.
pub type AlarmId = u32;

/// Deferred wake-up source (the OS alarm service on mobile hosts).
pub trait WakeScheduler: Send + Sync + 'static {
    /// Fires `id` once after `delay`, replacing any pending alarm with the same id.
    ///
    /// `allow_while_idle` asks the OS to fire even in low-power idle modes.
    fn schedule(&self, id: AlarmId, delay: Duration, allow_while_idle: bool);

    /// Cancels the pending alarm `id`, if any.
    fn cancel(&self, id: AlarmId);
}

struct Pending {
    generation: u64,
    token: CancellationToken,
}

#[derive(Default)]
struct Slots {
    next_generation: u64,
    pending: HashMap<AlarmId, Pending>,
}

/// [`WakeScheduler`] backed by tokio timers.
pub struct TokioAlarm {
    runtime: Handle,
    slots: Arc<Mutex<Slots>>,
    fired: mpsc::UnboundedSender<AlarmId>,
}

impl TokioAlarm {
    /// Creates the scheduler and the receiver of fired alarm ids.
    pub fn new(runtime: Handle) -> (Self, mpsc::UnboundedReceiver<AlarmId>) {
        let (fired, rx) = mpsc::unbounded_channel();
        let alarm = Self {
            runtime,
            slots: Arc::new(Mutex::new(Slots::default())),
            fired,
        };
        (alarm, rx)
    }

    /// Number of alarms waiting to fire.
    pub fn pending(&self) -> usize {
        self.slots.lock().pending.len()
    }
}

impl WakeScheduler for TokioAlarm {
    fn schedule(&self, id: AlarmId, delay: Duration, _allow_while_idle: bool) {
        let token = CancellationToken::new();
        let generation = {
            let mut slots = self.slots.lock();
            slots.next_generation += 1;
            let generation = slots.next_generation;
            let previous = slots.pending.insert(
                id,
                Pending {
                    generation,
                    token: token.clone(),
                },
            );
            if let Some(previous) = previous {
                previous.token.cancel();
            }
            generation
        };

        let slots = Arc::clone(&self.slots);
        let fired = self.fired.clone();
        self.runtime.spawn(async move {
            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => { return; }
            }
            {
                let mut slots = slots.lock();
                if slots.pending.get(&id).map(|p| p.generation) == Some(generation) {
                    slots.pending.remove(&id);
                } else {
                    return;
                }
            }
            let _ = fired.send(id);
        });
    }

    fn cancel(&self, id: AlarmId) {
        if let Some(pending) = self.slots.lock().pending.remove(&id) {
            pending.token.cancel();
        }
    }
}
