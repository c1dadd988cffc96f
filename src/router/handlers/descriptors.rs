use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::SupervisorError;
use crate::platform::DescriptorAddress;
use crate::router::envelope::{Request, Response};
use crate::router::methods::{READ_DESCRIPTOR, WRITE_DESCRIPTOR};

use super::{CapabilityHandler, HandlerContext};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadArgs {
    #[serde(flatten)]
    address: DescriptorAddress,
    transaction_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteArgs {
    #[serde(flatten)]
    address: DescriptorAddress,
    value: Vec<u8>,
    transaction_id: Option<String>,
}

pub struct DescriptorsHandler {
    ctx: HandlerContext,
}

impl DescriptorsHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    fn call(&self, req: &Request) -> Result<Value, SupervisorError> {
        if req.is(READ_DESCRIPTOR) {
            let args: ReadArgs = req.decode()?;
            let value = self
                .ctx
                .client
                .read_descriptor(&args.address, args.transaction_id.as_deref())?;
            Ok(json!({
                "descriptorUuid": args.address.descriptor_uuid,
                "value": value,
            }))
        } else {
            let args: WriteArgs = req.decode()?;
            self.ctx.client.write_descriptor(
                &args.address,
                &args.value,
                args.transaction_id.as_deref(),
            )?;
            Ok(Value::Null)
        }
    }
}

impl CapabilityHandler for DescriptorsHandler {
    fn name(&self) -> &'static str {
        "descriptors"
    }

    fn methods(&self) -> &'static [&'static str] {
        &[READ_DESCRIPTOR, WRITE_DESCRIPTOR]
    }

    fn handle(&self, request: &Request) -> Response {
        self.call(request).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::streams::EventStreams;
    use crate::testkit::FakeClient;

    #[test]
    fn descriptor_round_trip() {
        let client = Arc::new(FakeClient::default());
        let h = DescriptorsHandler::new(HandlerContext {
            client,
            streams: Arc::new(EventStreams::new()),
        });
        let addr = json!({
            "deviceId": "AA",
            "serviceUuid": "180d",
            "characteristicUuid": "2a37",
            "descriptorUuid": "2902"
        });

        let mut write = addr.clone();
        write["value"] = json!([1, 0]);
        assert!(h.handle(&Request::new(WRITE_DESCRIPTOR, write)).is_success());

        let Response::Success(read) = h.handle(&Request::new(READ_DESCRIPTOR, addr)) else {
            panic!("expected success");
        };
        assert_eq!(read["value"], json!([1, 0]));
        assert_eq!(read["descriptorUuid"], "2902");
    }
}
