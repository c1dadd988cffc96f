use serde::Deserialize;
use serde_json::Value;

use crate::error::SupervisorError;
use crate::platform::LogLevel;
use crate::router::envelope::{Request, Response};
use crate::router::methods::{LOG_LEVEL, SET_LOG_LEVEL};

use super::{CapabilityHandler, HandlerContext, to_value};

#[derive(Deserialize)]
struct SetLevelArgs {
    level: String,
}

/// Adapter library verbosity.
pub struct LogLevelHandler {
    ctx: HandlerContext,
}

impl LogLevelHandler {
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    fn call(&self, req: &Request) -> Result<Value, SupervisorError> {
        if req.is(SET_LOG_LEVEL) {
            let args: SetLevelArgs = req.decode()?;
            let level: LogLevel =
                args.level
                    .parse()
                    .map_err(|reason| SupervisorError::MalformedRequest {
                        method: req.method.clone(),
                        reason,
                    })?;
            self.ctx.client.set_log_level(level)?;
            Ok(Value::Null)
        } else {
            to_value(self.ctx.client.log_level())
        }
    }
}

impl CapabilityHandler for LogLevelHandler {
    fn name(&self) -> &'static str {
        "log_level"
    }

    fn methods(&self) -> &'static [&'static str] {
        &[SET_LOG_LEVEL, LOG_LEVEL]
    }

    fn handle(&self, request: &Request) -> Response {
        self.call(request).into()
    }
}
