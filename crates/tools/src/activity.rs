//! Wallet history: decoded activity and raw transactions.

use crate::args::{self, clamp_limit, lenient_u64};
use crate::{MAX_LIMIT, relay};
use async_trait::async_trait;
use serde::Deserialize;
use simchat_core::error::ToolError;
use simchat_core::tool::{Tool, ToolResult};
use simchat_sim::SimClient;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct AddressPageArgs {
    address: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    limit: Option<u64>,
}

fn address_page_schema(subject: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "address": {
                "type": "string",
                "description": format!("The wallet address to get {subject} for")
            },
            "limit": {
                "type": "number",
                "description": format!("Maximum number of {subject} to return (default: 25)"),
                "default": 25
            }
        },
        "required": ["address"],
        "additionalProperties": false
    })
}

pub struct WalletActivityTool {
    sim: Arc<SimClient>,
}

impl WalletActivityTool {
    pub fn new(sim: Arc<SimClient>) -> Self {
        Self { sim }
    }
}

#[async_trait]
impl Tool for WalletActivityTool {
    fn name(&self) -> &str {
        "get_wallet_activity"
    }

    fn description(&self) -> &str {
        "Get chronologically ordered transaction activity for an EVM wallet including transfers, \
         contract interactions, and decoded function calls."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        address_page_schema("activities")
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: AddressPageArgs = args::parse(arguments)?;
        let limit = clamp_limit(args.limit.unwrap_or(25), MAX_LIMIT);

        let result = self
            .sim
            .get_json(
                &["v1", "evm", "activity", &args.address],
                &[("limit", limit.to_string())],
            )
            .await;
        relay(self.name(), result)
    }
}

pub struct TransactionsTool {
    sim: Arc<SimClient>,
}

impl TransactionsTool {
    pub fn new(sim: Arc<SimClient>) -> Self {
        Self { sim }
    }
}

#[async_trait]
impl Tool for TransactionsTool {
    fn name(&self) -> &str {
        "get_transactions"
    }

    fn description(&self) -> &str {
        "Get detailed transaction information for an EVM wallet address."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        address_page_schema("transactions")
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: AddressPageArgs = args::parse(arguments)?;
        let limit = clamp_limit(args.limit.unwrap_or(25), MAX_LIMIT);

        let result = self
            .sim
            .get_json(
                &["v1", "evm", "transactions", &args.address],
                &[("limit", limit.to_string())],
            )
            .await;
        relay(self.name(), result)
    }
}
