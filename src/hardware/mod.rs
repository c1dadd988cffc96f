//! Hardware state observation.
//!
//! ## Architecture
//! ```text
//! OS thread ──► RawSignal ──► HardwareMonitor::on_signal()
//!                                   ├─► normalize() ──► HardwareChange (radio|location, on|off)
//!                                   ├─► AtomicHardwareStatus::store()
//!                                   └─► listener(HardwareChange)
//!                                          ├─► NotificationPolicy::refresh()
//!                                          ├─► adapter-state channel ("on"/"off")
//!                                          └─► running task (onReceiveData)
//! ```
//!
//! The monitor is attached once per task context and detached on teardown.

mod monitor;
mod status;

pub use monitor::{ChangeListener, HardwareChange, HardwareMonitor, Signal};
pub use status::HardwareStatus;
