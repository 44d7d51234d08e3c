//! Tool dispatch: resolve a tool name, run it, and reduce every outcome to
//! the text fed back to the model.

use simchat_core::error::ToolError;
use simchat_core::provider::ToolDefinition;
use simchat_core::tool::ToolRegistry;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Invokes registered tools on behalf of the conversation loop.
///
/// Never fails: unknown tools, bad arguments, and upstream errors all come
/// back as a JSON object with an `error` field so the model can explain the
/// problem to the user.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Definitions of every registered tool, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    pub async fn invoke(&self, name: &str, arguments: &serde_json::Value) -> String {
        let Some(tool) = self.registry.get(name) else {
            warn!(tool = name, "Model requested an unknown tool");
            return error_json(&ToolError::NotFound(name.to_string()).to_string());
        };

        let start = Instant::now();
        let result = tool.execute(arguments.clone()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(output) => {
                info!(tool = name, duration_ms, success = true, "Tool executed");
                output.output
            }
            Err(e) => {
                warn!(tool = name, duration_ms, success = false, error = %e, "Tool failed");
                let message = match e {
                    ToolError::InvalidArguments(reason) => {
                        format!("Invalid arguments for {name}: {reason}")
                    }
                    ToolError::ExecutionFailed { reason, .. } => reason,
                    not_found @ ToolError::NotFound(_) => not_found.to_string(),
                };
                error_json(&message)
            }
        }
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
