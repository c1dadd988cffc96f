//! # Lifecycle event subscriber.
//!
//! `Subscribe` is how hosts observe the supervisor: start attempts, restarts,
//! hardware changes, notification renders, client creation. Each subscriber
//! gets its own worker and bounded queue inside the
//! [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - `on_event` may await (I/O, batching); it never delays the supervisor's
//!   synchronous lifecycle calls or other subscribers.
//! - [`Subscribe::queue_capacity`] bounds the backlog. On overflow the event is
//!   dropped for this subscriber only and `SubscriberOverflow` is published.
//!
//! ## Example
//! ```rust
//! use bgvisor::{Event, EventKind, Subscribe};
//!
//! struct RestartCounter(std::sync::atomic::AtomicU32);
//!
//! #[async_trait::async_trait]
//! impl Subscribe for RestartCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::RestartScheduled {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//!     fn name(&self) -> &'static str { "restart-counter" }
//! }
//! ```

use crate::events::Event;
use async_trait::async_trait;

/// Observer of supervisor lifecycle events.
///
/// Runs on a dedicated worker task; avoid blocking the runtime.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name used in logs and in overflow/panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue (minimum 1).
    fn queue_capacity(&self) -> usize {
        256
    }
}
