//! NFT holdings (`/v1/evm/collectibles`).

use crate::args::{self, clamp_limit, lenient_u64};
use crate::{MAX_LIMIT, relay};
use async_trait::async_trait;
use serde::Deserialize;
use simchat_core::error::ToolError;
use simchat_core::tool::{Tool, ToolResult};
use simchat_sim::SimClient;
use std::sync::Arc;

pub struct NftCollectiblesTool {
    sim: Arc<SimClient>,
}

impl NftCollectiblesTool {
    pub fn new(sim: Arc<SimClient>) -> Self {
        Self { sim }
    }
}

#[derive(Debug, Deserialize)]
struct CollectiblesArgs {
    address: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    limit: Option<u64>,
}

#[async_trait]
impl Tool for NftCollectiblesTool {
    fn name(&self) -> &str {
        "get_nft_collectibles"
    }

    fn description(&self) -> &str {
        "Get NFT collectibles (ERC721 and ERC1155) owned by an EVM wallet address."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "The wallet address to get NFTs for"
                },
                "limit": {
                    "type": "number",
                    "description": "Maximum number of collectibles to return (default: 50)",
                    "default": 50
                }
            },
            "required": ["address"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: CollectiblesArgs = args::parse(arguments)?;
        let limit = clamp_limit(args.limit.unwrap_or(50), MAX_LIMIT);

        let result = self
            .sim
            .get_json(
                &["v1", "evm", "collectibles", &args.address],
                &[("limit", limit.to_string())],
            )
            .await;
        relay(self.name(), result)
    }
}
