//! # Event subscribers for the supervisor.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out for lifecycle events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Supervisor ── publish(Event) ──► Bus ──► subscriber listener ──► SubscriberSet::emit
//!                                                                    │
//!                                                     ┌──────────────┼──────────────┐
//!                                                     ▼              ▼              ▼
//!                                                 LogWriter       Metrics        Custom
//! ```
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], writing events through `tracing`.

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod embedded;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
