use serde::Deserialize;
use serde_json::Value;

use crate::error::SupervisorError;
use crate::router::envelope::{Request, Response};
use crate::router::methods::RSSI;

use super::{CapabilityHandler, HandlerContext};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RssiArgs {
    device_id: String,
    transaction_id: Option<String>,
}

pub struct RssiHandler {
    ctx: HandlerContext,
}

impl RssiHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    fn call(&self, req: &Request) -> Result<Value, SupervisorError> {
        let args: RssiArgs = req.decode()?;
        let rssi = self
            .ctx
            .client
            .read_rssi(&args.device_id, args.transaction_id.as_deref())?;
        Ok(Value::from(rssi))
    }
}

impl CapabilityHandler for RssiHandler {
    fn name(&self) -> &'static str {
        "rssi"
    }

    fn methods(&self) -> &'static [&'static str] {
        &[RSSI]
    }

    fn handle(&self, request: &Request) -> Response {
        self.call(request).into()
    }
}
