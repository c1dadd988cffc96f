//! # Built-in subscribers
//!
//! - [`LogWriter`]: forwards lifecycle events to `tracing` (demo/debug).

mod log;

pub use log::LogWriter;
