//! Runtime core: task lifecycle and orchestration.
//!
//! The public API from this module is [`Supervisor`] (with its builder),
//! [`Config`] and the lifecycle status types.
//!
//! Internal modules:
//! - [`supervisor`]: lifecycle state machine, restart/watchdog scheduling, run loop;
//! - [`context`]: the single live execution context and its ordered teardown;
//! - [`shutdown`]: host termination signal handling;
//! - [`builder`]: wires bus, subscribers, hardware monitor and notification policy.

mod builder;
mod config;
mod context;
mod shutdown;
mod state;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use config::{Config, NotificationConfig};
pub use state::{ServiceState, StartOutcome};
pub use supervisor::Supervisor;
