use serde::Deserialize;
use serde_json::Value;

use crate::error::SupervisorError;
use crate::router::envelope::{Request, Response};
use crate::router::methods::{CHARACTERISTICS, DISCOVER_ALL, SERVICES};

use super::{CapabilityHandler, HandlerContext, to_value};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscoverArgs {
    device_id: String,
    transaction_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServicesArgs {
    device_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacteristicsArgs {
    device_id: String,
    service_uuid: String,
}

/// Service and characteristic discovery.
pub struct DiscoveryHandler {
    ctx: HandlerContext,
}

impl DiscoveryHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    fn call(&self, req: &Request) -> Result<Value, SupervisorError> {
        let client = &self.ctx.client;
        if req.is(DISCOVER_ALL) {
            let args: DiscoverArgs = req.decode()?;
            client.discover(&args.device_id, args.transaction_id.as_deref())?;
            Ok(Value::Null)
        } else if req.is(SERVICES) {
            let args: ServicesArgs = req.decode()?;
            to_value(client.services(&args.device_id)?)
        } else {
            let args: CharacteristicsArgs = req.decode()?;
            to_value(client.characteristics(&args.device_id, &args.service_uuid)?)
        }
    }
}

impl CapabilityHandler for DiscoveryHandler {
    fn name(&self) -> &'static str {
        "discovery"
    }

    fn methods(&self) -> &'static [&'static str] {
        &[DISCOVER_ALL, SERVICES, CHARACTERISTICS]
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

    #[test]
    fn lists_services_as_camel_case() {
        let client = Arc::new(FakeClient::default());
        let h = DiscoveryHandler::new(HandlerContext {
            client: client.clone(),
            streams: Arc::new(EventStreams::new()),
        });

        assert!(
            h.handle(&Request::new(DISCOVER_ALL, json!({"deviceId": "AA"})))
                .is_success()
        );
        let Response::Success(services) =
            h.handle(&Request::new(SERVICES, json!({"deviceId": "AA"})))
        else {
            panic!("expected success");
        };
        assert_eq!(services[0]["deviceId"], "AA");
        assert_eq!(services[0]["isPrimary"], true);
    }

    #[test]
    fn adapter_failure_maps_to_error_code() {
        let client = Arc::new(FakeClient::default());
        client.fail_next(crate::error::AdapterError::new(205, "not discovered"));
        let h = DiscoveryHandler::new(HandlerContext {
            client,
            streams: Arc::new(EventStreams::new()),
        });

        let res = h.handle(&Request::new(
            CHARACTERISTICS,
            json!({"deviceId": "AA", "serviceUuid": "180d"}),
        ));
        assert_eq!(res.error_code(), Some("adapter_operation_failed"));
    }
}
