use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AdapterError, SupervisorError};
use crate::events::{Bus, Event, EventKind};
use crate::notification::NotificationPolicy;
use crate::platform::{
    AdapterClient, AdapterFactory, AdapterState, ClientOptions, RestoreCallback, ScanFilter,
    ScanResult, StateCallback,
};
use crate::prefs::{PreferenceStore, keys};
use crate::relay::Relay;
use crate::streams::EventStreams;

use super::ServiceControl;
use super::envelope::{Request, Response};
use super::handlers::{CapabilityHandler, HandlerContext, default_handlers};
use super::methods::*;

#[derive(Deserialize)]
struct NotificationInfoArgs {
    title: String,
    content: String,
}

#[derive(Deserialize)]
struct FlagArgs {
    value: bool,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StopArgs {
    manual: Option<bool>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SendDataArgs {
    payload: Value,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct CreateClientArgs {
    restore_state_identifier: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ScanArgs {
    uuids: Vec<String>,
    scan_mode: i32,
    callback_type: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelTransactionArgs {
    transaction_id: String,
}

/// Collaborators of one [`CommandRouter`].
pub struct RouterParts {
    pub adapter: Arc<dyn AdapterFactory>,
    pub prefs: Arc<dyn PreferenceStore>,
    pub notification: Arc<NotificationPolicy>,
    pub streams: Arc<EventStreams>,
    pub relay: Relay,
    pub control: Weak<dyn ServiceControl>,
    pub bus: Bus,
}

/// Dispatches named requests of one task context.
///
/// ### Routing
/// 1. Ordered capability handlers (first `can_handle` wins).
/// 2. Built-in lifecycle/notification/client commands.
/// 3. Capability methods with no client → `client_not_created`.
/// 4. Anything else → [`Response::NotImplemented`].
///
/// ### Rules
/// - Never holds a lock while calling back into the supervisor.
/// - Malformed arguments are answered locally with `malformed_request`.
pub struct CommandRouter {
    parts: RouterParts,
    client: Mutex<Option<Arc<dyn AdapterClient>>>,
    handlers: RwLock<Vec<Box<dyn CapabilityHandler>>>,
}

impl CommandRouter {
    pub fn new(parts: RouterParts) -> Self {
        Self {
            parts,
            client: Mutex::new(None),
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Routes `request` to exactly one answerer.
    pub fn dispatch(&self, request: &Request) -> Response {
        {
            let handlers = self.handlers.read();
            if let Some(handler) = handlers.iter().find(|h| h.can_handle(request)) {
                debug!(method = %request.method, handler = handler.name(), "dispatching to handler");
                return handler.handle(request);
            }
        }

        if let Some(res) = self.builtin(request) {
            return res.into();
        }

        if request.is_any(CAPABILITY_METHODS) {
            return SupervisorError::ClientNotCreated.into();
        }

        debug!(method = %request.method, "method not implemented");
        Response::NotImplemented
    }

    /// Names of the installed handlers, in priority order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.read().iter().map(|h| h.name()).collect()
    }

    pub fn has_client(&self) -> bool {
        self.client.lock().is_some()
    }

    /// Destroys the adapter client (if any) and closes the scan and
    /// connection-state channels. The channels stay reusable.
    pub fn release_client(&self) {
        let Some(client) = self.client.lock().take() else {
            return;
        };
        client.destroy();
        self.parts.streams.scan.complete();
        self.parts.streams.connection_state.complete();
        self.parts.bus.publish(Event::new(EventKind::ClientDestroyed));
    }

    /// Drops every capability handler; the next `createClient` rebuilds them.
    pub fn clear_handlers(&self) {
        self.handlers.write().clear();
    }

    fn builtin(&self, req: &Request) -> Option<Result<Value, SupervisorError>> {
        let res = if req.is(SET_NOTIFICATION_INFO) {
            self.set_notification_info(req)
        } else if req.is(SET_AUTO_START_ON_BOOT_MODE) {
            req.decode::<FlagArgs>().map(|args| {
                self.parts.prefs.set_bool(keys::AUTO_START_ON_BOOT, args.value);
                Value::Null
            })
        } else if req.is(SET_FOREGROUND_MODE) {
            req.decode::<FlagArgs>().map(|args| {
                self.parts.prefs.set_bool(keys::IS_FOREGROUND, args.value);
                self.parts.notification.refresh();
                Value::Null
            })
        } else if req.is(STOP_SERVICE) {
            self.stop_service(req)
        } else if req.is(SEND_DATA) {
            req.decode::<SendDataArgs>().map(|args| {
                let receivers = self.parts.relay.send(args.payload);
                debug!(receivers, "sendData relayed");
                Value::Null
            })
        } else if req.is(CREATE_CLIENT) {
            self.create_client(req)
        } else if req.is(DESTROY_CLIENT) {
            self.release_client();
            self.clear_handlers();
            Ok(Value::Null)
        } else if req.is(START_DEVICE_SCAN) {
            self.start_scan(req)
        } else if req.is(STOP_DEVICE_SCAN) {
            self.require_client().map(|client| {
                client.stop_scan();
                self.parts.streams.scan.complete();
                Value::Null
            })
        } else if req.is(CANCEL_TRANSACTION) {
            req.decode::<CancelTransactionArgs>().and_then(|args| {
                self.require_client()?.cancel_transaction(&args.transaction_id);
                Ok(Value::Null)
            })
        } else if req.is(IS_CLIENT_CREATED) {
            Ok(Value::Bool(self.has_client()))
        } else {
            return None;
        };
        Some(res)
    }

    fn set_notification_info(&self, req: &Request) -> Result<Value, SupervisorError> {
        let args: NotificationInfoArgs = req.decode()?;
        self.parts.notification.set_text(args.title, args.content);
        Ok(Value::Null)
    }

    fn stop_service(&self, req: &Request) -> Result<Value, SupervisorError> {
        let args: StopArgs = req.decode()?;
        let manual = args.manual.unwrap_or(true);
        match self.parts.control.upgrade() {
            Some(control) => control.request_stop(manual),
            None => warn!("stopService after supervisor dropped"),
        }
        Ok(Value::Null)
    }

    fn create_client(&self, req: &Request) -> Result<Value, SupervisorError> {
        let args: CreateClientArgs = req.decode()?;
        if self.has_client() {
            warn!("createClient over an existing client; releasing the old one");
            self.release_client();
        }

        let on_state: StateCallback = {
            let streams = Arc::clone(&self.parts.streams);
            Box::new(move |state: AdapterState| {
                streams.adapter_state.publish(state);
            })
        };
        let on_restore: RestoreCallback = {
            let streams = Arc::clone(&self.parts.streams);
            Box::new(move |id: i64| {
                streams.restore_state.publish(id);
            })
        };
        let client = self.parts.adapter.create_client(
            ClientOptions {
                restore_state_identifier: args.restore_state_identifier,
            },
            on_state,
            on_restore,
        )?;

        let handlers = default_handlers(&HandlerContext {
            client: Arc::clone(&client),
            streams: Arc::clone(&self.parts.streams),
        });
        *self.handlers.write() = handlers;
        *self.client.lock() = Some(client);
        self.parts.bus.publish(Event::new(EventKind::ClientCreated));
        Ok(Value::Null)
    }

    fn start_scan(&self, req: &Request) -> Result<Value, SupervisorError> {
        let args: ScanArgs = req.decode()?;
        let client = self.require_client()?;
        let streams = Arc::clone(&self.parts.streams);
        client.start_scan(
            ScanFilter {
                uuids: args.uuids,
                scan_mode: args.scan_mode,
                callback_type: args.callback_type,
            },
            Box::new(move |res: Result<ScanResult, AdapterError>| {
                streams.scan.publish(res);
            }),
        )?;
        Ok(Value::Null)
    }

    fn require_client(&self) -> Result<Arc<dyn AdapterClient>, SupervisorError> {
        self.client
            .lock()
            .clone()
            .ok_or(SupervisorError::ClientNotCreated)
    }
}
