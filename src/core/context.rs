use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::hardware::HardwareMonitor;
use crate::notification::NotificationPolicy;
use crate::platform::{EntryPoint, Execution};
use crate::router::CommandRouter;

/// The live execution handle. At most one exists, owned by the supervisor.
pub(crate) struct TaskExecutionContext {
    pub(crate) entry: EntryPoint,
    pub(crate) execution: Arc<dyn Execution>,
    pub(crate) router: Arc<CommandRouter>,
    /// Shared with the hardware listener; cleared before anything is torn down.
    pub(crate) live: Arc<AtomicBool>,
}

impl TaskExecutionContext {
    /// Destroys the context.
    ///
    /// Order: live flag → hardware monitor → notification → execution → adapter client → handlers.
    pub(crate) fn teardown(self, hardware: &HardwareMonitor, notification: &NotificationPolicy) {
        self.live.store(false, Ordering::Release);
        hardware.detach();
        notification.withdraw();
        self.execution.teardown();
        self.router.release_client();
        self.router.clear_handlers();
        tracing::debug!(handle = self.entry.handle, "execution context torn down");
    }
}
