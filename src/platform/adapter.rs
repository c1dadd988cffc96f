//! # Radio adapter library contract.
//!
//! Operations answered immediately return `Result<_, AdapterError>`.
//! Operations producing a stream of results take an [`EventCallback`]; the
//! library invokes it from any thread, with `Err` for asynchronous failures.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

/// Callback for streamed adapter results.
pub type EventCallback<T> = Box<dyn Fn(Result<T, AdapterError>) + Send + Sync>;
/// Callback for adapter power-state changes.
pub type StateCallback = Box<dyn Fn(AdapterState) + Send + Sync>;
/// Callback for restored-state identifiers.
pub type RestoreCallback = Box<dyn Fn(i64) + Send + Sync>;

/// Two-valued radio power state delivered on the adapter-state channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterState {
    On,
    Off,
}

impl AdapterState {
    /// `"on"` or `"off"`.
    pub fn as_str(self) -> &'static str {
        match self {
            AdapterState::On => "on",
            AdapterState::Off => "off",
        }
    }
}

impl From<bool> for AdapterState {
    fn from(enabled: bool) -> Self {
        if enabled {
            AdapterState::On
        } else {
            AdapterState::Off
        }
    }
}

impl fmt::Display for AdapterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`AdapterFactory::create_client`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Identifier used by the library to restore a previous session.
    pub restore_state_identifier: Option<String>,
}

/// Scan parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanFilter {
    pub uuids: Vec<String>,
    pub scan_mode: i32,
    pub callback_type: i32,
}

/// One advertisement seen during a scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub device_id: String,
    pub name: Option<String>,
    pub rssi: i32,
    #[serde(default)]
    pub service_uuids: Vec<String>,
    pub manufacturer_data: Option<Vec<u8>>,
    pub is_connectable: Option<bool>,
}

/// Connection parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    pub auto_connect: bool,
    pub request_mtu: Option<u16>,
    pub timeout_ms: Option<u64>,
}

/// Link state of one device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnecting,
    Disconnected,
}

/// Item of the connection-state channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStateEvent {
    pub device_id: String,
    pub state: ConnectionState,
}

/// A discovered GATT service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub uuid: String,
    pub device_id: String,
    pub is_primary: bool,
}

/// A discovered GATT characteristic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacteristicInfo {
    pub uuid: String,
    pub service_uuid: String,
    pub is_readable: bool,
    pub is_writable_with_response: bool,
    pub is_writable_without_response: bool,
    pub is_notifiable: bool,
    pub is_indicatable: bool,
}

/// Fully-qualified characteristic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacteristicAddress {
    pub device_id: String,
    pub service_uuid: String,
    pub characteristic_uuid: String,
}

/// Fully-qualified descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorAddress {
    #[serde(flatten)]
    pub characteristic: CharacteristicAddress,
    pub descriptor_uuid: String,
}

/// Item of the characteristic-monitor channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacteristicUpdate {
    #[serde(flatten)]
    pub characteristic: CharacteristicAddress,
    pub transaction_id: Option<String>,
    pub value: Vec<u8>,
}

/// Adapter library verbosity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Verbose,
    Debug,
    Info,
    Warning,
    Error,
    #[default]
    None,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_ascii_lowercase().as_str() {
            "verbose" => LogLevel::Verbose,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            "none" => LogLevel::None,
            other => return Err(format!("unknown log level `{other}`")),
        };
        Ok(level)
    }
}

/// Entry point of the adapter library.
pub trait AdapterFactory: Send + Sync + 'static {
    /// Creates a client. State and restore callbacks live as long as the client.
    fn create_client(
        &self,
        options: ClientOptions,
        on_state: StateCallback,
        on_restore: RestoreCallback,
    ) -> Result<Arc<dyn AdapterClient>, AdapterError>;
}

/// Capability-scoped operations of one adapter client.
pub trait AdapterClient: Send + Sync + 'static {
    /// Releases the native client. No other call is made afterwards.
    fn destroy(&self);

    // discovery
    fn start_scan(
        &self,
        filter: ScanFilter,
        on_result: EventCallback<ScanResult>,
    ) -> Result<(), AdapterError>;
    fn stop_scan(&self);
    fn cancel_transaction(&self, transaction_id: &str);

    // connection
    fn connect(
        &self,
        device_id: &str,
        options: ConnectOptions,
        on_state: EventCallback<ConnectionState>,
    ) -> Result<(), AdapterError>;
    fn is_connected(&self, device_id: &str) -> Result<bool, AdapterError>;
    fn cancel_connection(&self, device_id: &str) -> Result<(), AdapterError>;
    fn connection_state(&self, device_id: &str) -> Result<ConnectionState, AdapterError>;

    // services
    fn discover(&self, device_id: &str, transaction_id: Option<&str>) -> Result<(), AdapterError>;
    fn services(&self, device_id: &str) -> Result<Vec<ServiceInfo>, AdapterError>;
    fn characteristics(
        &self,
        device_id: &str,
        service_uuid: &str,
    ) -> Result<Vec<CharacteristicInfo>, AdapterError>;

    // characteristics
    fn read_characteristic(
        &self,
        address: &CharacteristicAddress,
        transaction_id: Option<&str>,
    ) -> Result<Vec<u8>, AdapterError>;
    fn write_characteristic(
        &self,
        address: &CharacteristicAddress,
        value: &[u8],
        with_response: bool,
        transaction_id: Option<&str>,
    ) -> Result<(), AdapterError>;
    fn monitor_characteristic(
        &self,
        address: &CharacteristicAddress,
        transaction_id: Option<&str>,
        on_value: EventCallback<Vec<u8>>,
    ) -> Result<(), AdapterError>;

    // descriptors
    fn read_descriptor(
        &self,
        address: &DescriptorAddress,
        transaction_id: Option<&str>,
    ) -> Result<Vec<u8>, AdapterError>;
    fn write_descriptor(
        &self,
        address: &DescriptorAddress,
        value: &[u8],
        transaction_id: Option<&str>,
    ) -> Result<(), AdapterError>;

    // link parameters
    fn read_rssi(&self, device_id: &str, transaction_id: Option<&str>) -> Result<i32, AdapterError>;
    fn request_mtu(
        &self,
        device_id: &str,
        mtu: u16,
        transaction_id: Option<&str>,
    ) -> Result<u16, AdapterError>;

    // diagnostics
    fn set_log_level(&self, level: LogLevel) -> Result<(), AdapterError>;
    fn log_level(&self) -> LogLevel;
}
