//! Capability handlers.
//!
//! Each handler serves one family of adapter operations behind the uniform
//! [`CapabilityHandler`] contract. The router asks them in priority order and
//! the first whose `can_handle` is true answers:
//!
//! ```text
//! 1. connection        connectToDevice, isDeviceConnected, observeConnectionState, cancelConnection
//! 2. discovery         discoverAllServicesAndCharacteristics, services, characteristics
//! 3. characteristics   read/write/monitorCharacteristicForDevice
//! 4. descriptors       read/writeDescriptorForDevice
//! 5. rssi              rssi
//! 6. mtu               requestMtu
//! 7. log level         setLogLevel, logLevel
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::error::SupervisorError;
use crate::platform::AdapterClient;
use crate::streams::EventStreams;

use super::envelope::{Request, Response};

mod characteristics;
mod connection;
mod descriptors;
mod discovery;
mod log_level;
mod mtu;
mod rssi;

pub use characteristics::CharacteristicsHandler;
pub use connection::ConnectionHandler;
pub use descriptors::DescriptorsHandler;
pub use discovery::DiscoveryHandler;
pub use log_level::LogLevelHandler;
pub use mtu::MtuHandler;
pub use rssi::RssiHandler;

/// One family of adapter operations.
pub trait CapabilityHandler: Send + Sync + 'static {
    /// Short name (for logs and priority inspection).
    fn name(&self) -> &'static str;

    /// Methods this handler answers.
    fn methods(&self) -> &'static [&'static str];

    /// True if this handler answers `request`.
    fn can_handle(&self, request: &Request) -> bool {
        request.is_any(self.methods())
    }

    /// Answers `request`. Only called when `can_handle` returned true.
    fn handle(&self, request: &Request) -> Response;
}

/// Shared state handed to every handler of one adapter client.
#[derive(Clone)]
pub struct HandlerContext {
    pub client: Arc<dyn AdapterClient>,
    pub streams: Arc<EventStreams>,
}

/// Builds the handler list in priority order.
pub fn default_handlers(ctx: &HandlerContext) -> Vec<Box<dyn CapabilityHandler>> {
    vec![
        Box::new(ConnectionHandler::new(ctx.clone())),
        Box::new(DiscoveryHandler::new(ctx.clone())),
        Box::new(CharacteristicsHandler::new(ctx.clone())),
        Box::new(DescriptorsHandler::new(ctx.clone())),
        Box::new(RssiHandler::new(ctx.clone())),
        Box::new(MtuHandler::new(ctx.clone())),
        Box::new(LogLevelHandler::new(ctx.clone())),
    ]
}

/// Serializes a handler result.
pub(crate) fn to_value<T: serde::Serialize>(value: T) -> Result<Value, SupervisorError> {
    serde_json::to_value(value).map_err(|e| SupervisorError::MalformedRequest {
        method: "<response>".to_string(),
        reason: e.to_string(),
    })
}
