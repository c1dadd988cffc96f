//! Method names of the command surface. Matching is ASCII case-insensitive.

// built-ins
pub const SET_NOTIFICATION_INFO: &str = "setNotificationInfo";
pub const SET_AUTO_START_ON_BOOT_MODE: &str = "setAutoStartOnBootMode";
pub const SET_FOREGROUND_MODE: &str = "setForegroundMode";
pub const STOP_SERVICE: &str = "stopService";
pub const SEND_DATA: &str = "sendData";
pub const CREATE_CLIENT: &str = "createClient";
pub const DESTROY_CLIENT: &str = "destroyClient";
pub const START_DEVICE_SCAN: &str = "startDeviceScan";
pub const STOP_DEVICE_SCAN: &str = "stopDeviceScan";
pub const CANCEL_TRANSACTION: &str = "cancelTransaction";
pub const IS_CLIENT_CREATED: &str = "isClientCreated";

// connection
pub const CONNECT_TO_DEVICE: &str = "connectToDevice";
pub const IS_DEVICE_CONNECTED: &str = "isDeviceConnected";
pub const OBSERVE_CONNECTION_STATE: &str = "observeConnectionState";
pub const CANCEL_CONNECTION: &str = "cancelConnection";

// discovery
pub const DISCOVER_ALL: &str = "discoverAllServicesAndCharacteristics";
pub const SERVICES: &str = "services";
pub const CHARACTERISTICS: &str = "characteristics";

// characteristics
pub const READ_CHARACTERISTIC: &str = "readCharacteristicForDevice";
pub const WRITE_CHARACTERISTIC: &str = "writeCharacteristicForDevice";
pub const MONITOR_CHARACTERISTIC: &str = "monitorCharacteristicForDevice";

// descriptors
pub const READ_DESCRIPTOR: &str = "readDescriptorForDevice";
pub const WRITE_DESCRIPTOR: &str = "writeDescriptorForDevice";

pub const RSSI: &str = "rssi";
pub const REQUEST_MTU: &str = "requestMtu";

// log level
pub const SET_LOG_LEVEL: &str = "setLogLevel";
pub const LOG_LEVEL: &str = "logLevel";

/// Methods served by capability handlers; they need a client.
pub const CAPABILITY_METHODS: &[&str] = &[
    CONNECT_TO_DEVICE,
    IS_DEVICE_CONNECTED,
    OBSERVE_CONNECTION_STATE,
    CANCEL_CONNECTION,
    DISCOVER_ALL,
    SERVICES,
    CHARACTERISTICS,
    READ_CHARACTERISTIC,
    WRITE_CHARACTERISTIC,
    MONITOR_CHARACTERISTIC,
    READ_DESCRIPTOR,
    WRITE_DESCRIPTOR,
    RSSI,
    REQUEST_MTU,
    SET_LOG_LEVEL,
    LOG_LEVEL,
];
