use serde_json::Value;

use crate::error::EngineError;

/// Runnable entry point resolved from a persisted callback handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPoint {
    /// Handle the entry point was resolved from.
    pub handle: i64,
    /// Library (bundle) containing the function.
    pub library: String,
    /// Function name inside the library.
    pub function: String,
}

/// Options passed to [`ExecutionEngine::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Whether the host runs with a persistent notification (elevated priority).
    pub is_foreground: bool,
}

/// The engine that executes the background task's user logic.
pub trait ExecutionEngine: Send + Sync + 'static {
    /// Maps a persisted handle to an entry point, or `None` if unknown.
    fn resolve(&self, handle: i64) -> Option<EntryPoint>;

    /// Starts executing `entry`.
    ///
    /// Returns [`EngineError::LinkNotReady`] when the native side is not loaded yet.
    fn start(
        &self,
        entry: &EntryPoint,
        options: LaunchOptions,
    ) -> Result<Box<dyn Execution>, EngineError>;
}

/// A live execution started by an [`ExecutionEngine`].
pub trait Execution: Send + Sync + 'static {
    /// True while the task's code is still executing.
    fn is_executing(&self) -> bool;

    /// Pushes a host-originated message to the task (fire-and-forget).
    fn deliver(&self, method: &str, payload: Value);

    /// Detaches from the host and destroys the execution. Called exactly once.
    fn teardown(&self);
}
