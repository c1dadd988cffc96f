//! Command routing.
//!
//! ## Architecture
//! ```text
//! Request ──► CommandRouter::dispatch
//!                 ├─► handlers[0..n].can_handle()  (first match wins)
//!                 ├─► built-ins (lifecycle, notification, client, scan)
//!                 ├─► capability method, no client ──► Error{client_not_created}
//!                 └─► Response::NotImplemented
//! ```
//!
//! One router is bound to each task context. It reaches back into the
//! supervisor only through [`ServiceControl`] (held weakly).

mod envelope;
pub mod handlers;
pub mod methods;
#[allow(clippy::module_inception)]
mod router;

pub use envelope::{Request, Response};
pub use router::{CommandRouter, RouterParts};

/// Lifecycle control the router may request from its owner.
pub trait ServiceControl: Send + Sync + 'static {
    /// Stops the task; `manual` stops suppress restarts.
    fn request_stop(&self, manual: bool);
}
