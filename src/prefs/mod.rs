//! Durable key/value settings.
//!
//! ## Contents
//! - [`PreferenceStore`] the get/set contract consumed by the supervisor
//! - [`MemoryPreferences`] in-process store (tests, hosts with their own persistence)
//! - [`SledPreferences`] sled database on disk, flushed on every write
//! - [`ServiceConfig`] typed view over the four persisted keys
//!
//! ## Keys
//! ```text
//! callback_handle      i64   (default 0 = unset)
//! is_foreground        bool  (default true)
//! auto_start_on_boot   bool  (default true)
//! is_manually_stopped  bool  (default false)
//! ```

mod config;
mod disk;
mod store;

pub use config::{ServiceConfig, keys};
pub use disk::SledPreferences;
pub use store::{MemoryPreferences, PrefValue, PreferenceStore};
