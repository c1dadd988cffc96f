use serde::Deserialize;
use serde_json::Value;

use crate::error::{AdapterError, SupervisorError};
use crate::platform::{ConnectOptions, ConnectionState, ConnectionStateEvent};
use crate::router::envelope::{Request, Response};
use crate::router::methods::{
    CANCEL_CONNECTION, CONNECT_TO_DEVICE, IS_DEVICE_CONNECTED, OBSERVE_CONNECTION_STATE,
};

use super::{CapabilityHandler, HandlerContext};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectArgs {
    device_id: String,
    #[serde(default)]
    is_auto_connect: bool,
    request_mtu: Option<u16>,
    timeout_millis: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceArgs {
    device_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObserveArgs {
    device_id: String,
    #[serde(default)]
    emit_current_value: bool,
}

/// Connect, query and cancel device links. Link changes go to the
/// connection-state channel.
pub struct ConnectionHandler {
    ctx: HandlerContext,
}

impl ConnectionHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    fn call(&self, req: &Request) -> Result<Value, SupervisorError> {
        let client = &self.ctx.client;
        if req.is(CONNECT_TO_DEVICE) {
            let args: ConnectArgs = req.decode()?;
            let options = ConnectOptions {
                auto_connect: args.is_auto_connect,
                request_mtu: args.request_mtu,
                timeout_ms: args.timeout_millis,
            };
            let streams = self.ctx.streams.clone();
            let device_id = args.device_id.clone();
            client.connect(
                &args.device_id,
                options,
                Box::new(move |res: Result<ConnectionState, AdapterError>| {
                    let item = res.map(|state| ConnectionStateEvent {
                        device_id: device_id.clone(),
                        state,
                    });
                    streams.connection_state.publish(item);
                }),
            )?;
            Ok(Value::Null)
        } else if req.is(IS_DEVICE_CONNECTED) {
            let args: DeviceArgs = req.decode()?;
            Ok(Value::Bool(client.is_connected(&args.device_id)?))
        } else if req.is(OBSERVE_CONNECTION_STATE) {
            let args: ObserveArgs = req.decode()?;
            if args.emit_current_value {
                let state = client.connection_state(&args.device_id)?;
                self.ctx
                    .streams
                    .connection_state
                    .publish(Ok(ConnectionStateEvent {
                        device_id: args.device_id,
                        state,
                    }));
            }
            Ok(Value::Null)
        } else {
            let args: DeviceArgs = req.decode()?;
            client.cancel_connection(&args.device_id)?;
            Ok(Value::Null)
        }
    }
}

impl CapabilityHandler for ConnectionHandler {
    fn name(&self) -> &'static str {
        "connection"
    }

    fn methods(&self) -> &'static [&'static str] {
        &[
            CONNECT_TO_DEVICE,
            IS_DEVICE_CONNECTED,
            OBSERVE_CONNECTION_STATE,
            CANCEL_CONNECTION,
        ]
    }

    fn handle(&self, request: &Request) -> Response {
        self.call(request).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::streams::EventStreams;
    use crate::testkit::FakeClient;

    fn handler() -> (ConnectionHandler, Arc<FakeClient>, Arc<EventStreams>) {
        let client = Arc::new(FakeClient::default());
        let streams = Arc::new(EventStreams::new());
        let h = ConnectionHandler::new(HandlerContext {
            client: client.clone(),
            streams: streams.clone(),
        });
        (h, client, streams)
    }

    #[test]
    fn connect_streams_state_changes() {
        let (h, client, streams) = handler();
        let mut sub = streams.connection_state.subscribe();

        let res = h.handle(&Request::new(
            CONNECT_TO_DEVICE,
            json!({"deviceId": "AA", "requestMtu": 185}),
        ));
        assert!(res.is_success());
        assert_eq!(client.connect_options("AA").unwrap().request_mtu, Some(185));

        client.emit_connection("AA", Ok(ConnectionState::Connected));
        client.emit_connection("AA", Err(AdapterError::new(201, "lost")));

        assert_eq!(
            sub.try_next().unwrap().unwrap(),
            ConnectionStateEvent {
                device_id: "AA".into(),
                state: ConnectionState::Connected
            }
        );
        assert_eq!(sub.try_next().unwrap().unwrap_err().code, 201);
    }

    #[test]
    fn observe_emits_current_value_on_request() {
        let (h, client, streams) = handler();
        client.set_connected("AA", true);
        let mut sub = streams.connection_state.subscribe();

        h.handle(&Request::new(OBSERVE_CONNECTION_STATE, json!({"deviceId": "AA"})));
        assert!(sub.try_next().is_none());

        h.handle(&Request::new(
            OBSERVE_CONNECTION_STATE,
            json!({"deviceId": "AA", "emitCurrentValue": true}),
        ));
        assert_eq!(
            sub.try_next().unwrap().unwrap().state,
            ConnectionState::Connected
        );
    }

    #[test]
    fn missing_device_id_is_malformed() {
        let (h, _, _) = handler();
        let res = h.handle(&Request::new(IS_DEVICE_CONNECTED, json!({})));
        assert_eq!(res.error_code(), Some("malformed_request"));
    }
}
