//! Event stream multiplexer.
//!
//! Five independently-lifecycled [`StreamChannel`]s pushing asynchronous
//! adapter events to the foreground side.
//!
//! ```text
//! adapter-state     "on" / "off"                    (hardware listener, adapter callback)
//! restore-state     i64                             (createClient restore callback)
//! scan              Result<ScanResult, _>           (startDeviceScan)
//! connection-state  Result<ConnectionStateEvent, _> (connectToDevice / observeConnectionState)
//! characteristic    Result<CharacteristicUpdate, _> (monitorCharacteristicForDevice)
//! ```
//!
//! Per-channel delivery order equals publish order; there is no ordering
//! across channels.

mod channel;

pub use channel::{StreamChannel, Subscription};

use crate::error::AdapterError;
use crate::platform::{AdapterState, CharacteristicUpdate, ConnectionStateEvent, ScanResult};

/// The fixed set of event channels shared by the router and its handlers.
pub struct EventStreams {
    pub adapter_state: StreamChannel<AdapterState>,
    pub restore_state: StreamChannel<i64>,
    pub scan: StreamChannel<Result<ScanResult, AdapterError>>,
    pub connection_state: StreamChannel<Result<ConnectionStateEvent, AdapterError>>,
    pub characteristic: StreamChannel<Result<CharacteristicUpdate, AdapterError>>,
}

impl EventStreams {
    pub fn new() -> Self {
        Self {
            adapter_state: StreamChannel::new("adapter_state"),
            restore_state: StreamChannel::new("restore_state"),
            scan: StreamChannel::new("scan"),
            connection_state: StreamChannel::new("connection_state"),
            characteristic: StreamChannel::new("characteristic"),
        }
    }

    /// Completes every channel.
    pub fn complete_all(&self) {
        self.adapter_state.complete();
        self.restore_state.complete();
        self.scan.complete();
        self.connection_state.complete();
        self.characteristic.complete();
    }
}

impl Default for EventStreams {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_all_detaches_every_channel() {
        let streams = EventStreams::new();
        let _a = streams.adapter_state.subscribe();
        let _s = streams.scan.subscribe();
        assert!(streams.scan.is_subscribed());

        streams.complete_all();
        assert!(!streams.adapter_state.is_subscribed());
        assert!(!streams.scan.is_subscribed());
        assert!(!streams.adapter_state.publish(AdapterState::On));
    }
}
