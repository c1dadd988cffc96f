use serde::Deserialize;
use serde_json::Value;

use crate::error::SupervisorError;
use crate::router::envelope::{Request, Response};
use crate::router::methods::REQUEST_MTU;

use super::{CapabilityHandler, HandlerContext};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MtuArgs {
    device_id: String,
    mtu: u16,
    transaction_id: Option<String>,
}

pub struct MtuHandler {
    ctx: HandlerContext,
}

impl MtuHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    fn call(&self, req: &Request) -> Result<Value, SupervisorError> {
        let args: MtuArgs = req.decode()?;
        let negotiated =
            self.ctx
                .client
                .request_mtu(&args.device_id, args.mtu, args.transaction_id.as_deref())?;
        Ok(Value::from(negotiated))
    }
}

impl CapabilityHandler for MtuHandler {
    fn name(&self) -> &'static str {
        "mtu"
    }

    fn methods(&self) -> &'static [&'static str] {
        &[REQUEST_MTU]
    }

    fn handle(&self, request: &Request) -> Response {
        self.call(request).into()
    }
}
