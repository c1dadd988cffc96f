//! Persistent status notification.
//!
//! - [`compute_notification`]: pure mapping from [`HardwareStatus`](crate::HardwareStatus)
//!   to icon / text / tap target.
//! - [`NotificationPolicy`]: owns the current text, reads the foreground flag and
//!   renders or withdraws through the [`NotificationSurface`](crate::platform::NotificationSurface).
//!
//! ## Truth table
//! ```text
//! radio  location │ icon        tap target
//! ────────────────┼──────────────────────────────
//!  on     on      │ Running     App
//!  on     off     │ NotRunning  LocationSettings
//!  off    on      │ NotRunning  RadioSettings
//!  off    off     │ NotRunning  LocationSettings
//! ```

mod policy;
mod presenter;

pub use policy::{NotificationContent, NotificationIcon, NotificationText, TapTarget, compute_notification};
pub use presenter::NotificationPolicy;
