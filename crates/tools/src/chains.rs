//! Supported-chain catalog.

use crate::relay;
use async_trait::async_trait;
use simchat_core::error::ToolError;
use simchat_core::tool::{Tool, ToolResult};
use simchat_sim::SimClient;
use std::sync::Arc;

pub struct SupportedChainsTool {
    sim: Arc<SimClient>,
}

impl SupportedChainsTool {
    pub fn new(sim: Arc<SimClient>) -> Self {
        Self { sim }
    }
}

#[async_trait]
impl Tool for SupportedChainsTool {
    fn name(&self) -> &str {
        "get_supported_chains"
    }

    fn description(&self) -> &str {
        "Get list of all supported EVM chains and their capabilities."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let result = self
            .sim
            .get_json(&["v1", "evm", "supported-chains"], &[])
            .await;
        relay(self.name(), result)
    }
}
