//! Error types used by the bgvisor runtime and its collaborators.
//!
//! This module defines:
//!
//! - [`SupervisorError`]: failures of the supervisor and command routing itself.
//! - [`EngineError`]: failures reported by the execution engine.
//! - [`AdapterError`]: failures reported by the radio adapter library.
//! - [`PreferenceError`]: failures of the sled-backed preference store.
//!
//! Errors that reach a caller over the command surface are turned into a
//! [`Response::Error`](crate::Response::Error) whose code is [`SupervisorError::as_label`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// # Errors produced by the supervisor and the command router.
///
/// None of these are fatal to the process: start failures leave the supervisor
/// `Idle` until the next trigger, request failures are answered locally.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupervisorError {
    /// No callback handle has been persisted; the start attempt is skipped.
    #[error("callback handle not configured")]
    ConfigMissing,

    /// The persisted handle does not map to a runnable entry point.
    #[error("callback handle {handle} could not be resolved: {reason}")]
    ResolutionFailed {
        /// The handle read from the preference store.
        handle: i64,
        /// Why resolution or launch failed.
        reason: String,
    },

    /// The native binding is not ready yet (typically right after a reboot).
    #[error("native link not ready: {reason}")]
    TransientLinkFailure {
        /// Message from the engine.
        reason: String,
    },

    /// A request carried missing or badly typed arguments.
    #[error("malformed `{method}` request: {reason}")]
    MalformedRequest {
        /// Method name as received.
        method: String,
        /// Decoder message.
        reason: String,
    },

    /// The adapter library rejected an operation.
    #[error("adapter operation failed: {0}")]
    AdapterOperationFailed(#[from] AdapterError),

    /// A capability command arrived while no adapter client exists.
    #[error("adapter client not created")]
    ClientNotCreated,

    /// A request arrived while no task context is alive.
    #[error("background task not running")]
    TaskNotRunning,
}

impl SupervisorError {
    /// Returns a short stable label (snake_case) for logs and response codes.
    ///
    /// # Example
    /// ```
    /// use bgvisor::SupervisorError;
    ///
    /// assert_eq!(SupervisorError::ConfigMissing.as_label(), "config_missing");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorError::ConfigMissing => "config_missing",
            SupervisorError::ResolutionFailed { .. } => "resolution_failed",
            SupervisorError::TransientLinkFailure { .. } => "transient_link_failure",
            SupervisorError::MalformedRequest { .. } => "malformed_request",
            SupervisorError::AdapterOperationFailed(_) => "adapter_operation_failed",
            SupervisorError::ClientNotCreated => "client_not_created",
            SupervisorError::TaskNotRunning => "task_not_running",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SupervisorError::ConfigMissing => "no callback handle persisted".to_string(),
            SupervisorError::ResolutionFailed { handle, reason } => {
                format!("handle={handle}: {reason}")
            }
            SupervisorError::TransientLinkFailure { reason } => format!("link: {reason}"),
            SupervisorError::MalformedRequest { method, reason } => {
                format!("{method}: {reason}")
            }
            SupervisorError::AdapterOperationFailed(e) => e.to_string(),
            SupervisorError::ClientNotCreated => "call createClient first".to_string(),
            SupervisorError::TaskNotRunning => "no execution context".to_string(),
        }
    }

    /// Indicates whether the failure is expected to clear on a later trigger.
    ///
    /// Only [`SupervisorError::TransientLinkFailure`] qualifies.
    pub fn is_transient(&self) -> bool {
        matches!(self, SupervisorError::TransientLinkFailure { .. })
    }
}

/// # Errors reported by the execution engine.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The entry point vanished between resolution and launch.
    #[error("entry point not found")]
    NotFound,

    /// Native library not loaded yet.
    #[error("native link not ready: {0}")]
    LinkNotReady(String),

    /// Any other launch failure.
    #[error("engine failed: {0}")]
    Failed(String),
}

/// # Error reported by the radio adapter library.
///
/// Delivered either synchronously (request/response operations) or as an error
/// item on the owning event channel.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("adapter error {code}: {message}")]
pub struct AdapterError {
    /// Library-specific error code.
    pub code: i32,
    /// Library message.
    pub message: String,
}

impl AdapterError {
    /// Builds an adapter error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// # Errors produced by [`SledPreferences`](crate::prefs::SledPreferences).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// Opening, reading or flushing the database failed.
    #[error("preference store: {0}")]
    Store(#[from] sled::Error),

    /// A stored value is not a valid preference encoding.
    #[error("preference encoding: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let err = SupervisorError::ResolutionFailed {
            handle: 42,
            reason: "gone".into(),
        };
        assert_eq!(err.as_label(), "resolution_failed");
        assert_eq!(err.as_message(), "handle=42: gone");
        assert!(!err.is_transient());

        let link = SupervisorError::TransientLinkFailure {
            reason: "libapp.so".into(),
        };
        assert!(link.is_transient());
    }

    #[test]
    fn adapter_error_converts() {
        let err: SupervisorError = AdapterError::new(201, "disconnected").into();
        assert_eq!(err.as_label(), "adapter_operation_failed");
        assert_eq!(err.as_message(), "adapter error 201: disconnected");
    }
}
