//! Lifecycle events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor`, `NotificationPolicy`, the hardware listener,
//!   `CommandRouter`, `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: `Supervisor::run()` (fans out to `SubscriberSet`), tests.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
