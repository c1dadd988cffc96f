use serde::Deserialize;
use serde_json::Value;

use crate::error::{AdapterError, SupervisorError};
use crate::platform::{CharacteristicAddress, CharacteristicUpdate};
use crate::router::envelope::{Request, Response};
use crate::router::methods::{MONITOR_CHARACTERISTIC, READ_CHARACTERISTIC, WRITE_CHARACTERISTIC};

use super::{CapabilityHandler, HandlerContext, to_value};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressArgs {
    #[serde(flatten)]
    address: CharacteristicAddress,
    transaction_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteArgs {
    #[serde(flatten)]
    address: CharacteristicAddress,
    value: Vec<u8>,
    #[serde(default = "default_with_response")]
    with_response: bool,
    transaction_id: Option<String>,
}

fn default_with_response() -> bool {
    true
}

/// Read, write and monitor characteristics. Monitored values go to the
/// characteristic channel.
pub struct CharacteristicsHandler {
    ctx: HandlerContext,
}

impl CharacteristicsHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    fn call(&self, req: &Request) -> Result<Value, SupervisorError> {
        let client = &self.ctx.client;
        if req.is(READ_CHARACTERISTIC) {
            let args: AddressArgs = req.decode()?;
            let value = client.read_characteristic(&args.address, args.transaction_id.as_deref())?;
            to_value(CharacteristicUpdate {
                characteristic: args.address,
                transaction_id: args.transaction_id,
                value,
            })
        } else if req.is(WRITE_CHARACTERISTIC) {
            let args: WriteArgs = req.decode()?;
            client.write_characteristic(
                &args.address,
                &args.value,
                args.with_response,
                args.transaction_id.as_deref(),
            )?;
            Ok(Value::Null)
        } else {
            let args: AddressArgs = req.decode()?;
            let streams = self.ctx.streams.clone();
            let address = args.address.clone();
            let transaction_id = args.transaction_id.clone();
            client.monitor_characteristic(
                &args.address,
                args.transaction_id.as_deref(),
                Box::new(move |res: Result<Vec<u8>, AdapterError>| {
                    let item = res.map(|value| CharacteristicUpdate {
                        characteristic: address.clone(),
                        transaction_id: transaction_id.clone(),
                        value,
                    });
                    streams.characteristic.publish(item);
                }),
            )?;
            Ok(Value::Null)
        }
    }
}

impl CapabilityHandler for CharacteristicsHandler {
    fn name(&self) -> &'static str {
        "characteristics"
    }

    fn methods(&self) -> &'static [&'static str] {
        &[READ_CHARACTERISTIC, WRITE_CHARACTERISTIC, MONITOR_CHARACTERISTIC]
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

    fn args() -> Value {
        json!({
            "deviceId": "AA",
            "serviceUuid": "180d",
            "characteristicUuid": "2a37",
            "transactionId": "t1"
        })
    }

    #[test]
    fn write_then_read_round_trips_value() {
        let client = Arc::new(FakeClient::default());
        let h = CharacteristicsHandler::new(HandlerContext {
            client: client.clone(),
            streams: Arc::new(EventStreams::new()),
        });

        let mut write = args();
        write["value"] = json!([7, 8]);
        assert!(h.handle(&Request::new(WRITE_CHARACTERISTIC, write)).is_success());

        let Response::Success(read) = h.handle(&Request::new(READ_CHARACTERISTIC, args())) else {
            panic!("expected success");
        };
        assert_eq!(read["value"], json!([7, 8]));
        assert_eq!(read["transactionId"], "t1");
    }

    #[test]
    fn monitor_publishes_updates() {
        let client = Arc::new(FakeClient::default());
        let streams = Arc::new(EventStreams::new());
        let h = CharacteristicsHandler::new(HandlerContext {
            client: client.clone(),
            streams: streams.clone(),
        });
        let mut sub = streams.characteristic.subscribe();

        assert!(h.handle(&Request::new(MONITOR_CHARACTERISTIC, args())).is_success());
        client.emit_monitor(Ok(vec![42]));

        let update = sub.try_next().unwrap().unwrap();
        assert_eq!(update.value, vec![42]);
        assert_eq!(update.characteristic.characteristic_uuid, "2a37");
    }
}
