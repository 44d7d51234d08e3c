//! Token-centric lookups: EVM token info and holders, SVM mint metadata.

use crate::args::{self, clamp_limit, lenient_u64};
use crate::{MAX_LIMIT, relay};
use async_trait::async_trait;
use serde::Deserialize;
use simchat_core::error::ToolError;
use simchat_core::tool::{Tool, ToolResult};
use simchat_sim::SimClient;
use std::sync::Arc;

pub struct TokenInfoTool {
    sim: Arc<SimClient>,
}

impl TokenInfoTool {
    pub fn new(sim: Arc<SimClient>) -> Self {
        Self { sim }
    }
}

#[derive(Debug, Deserialize)]
struct TokenInfoArgs {
    token_address: String,
    #[serde(default = "default_chain_ids")]
    chain_ids: String,
}

fn default_chain_ids() -> String {
    "all".into()
}

#[async_trait]
impl Tool for TokenInfoTool {
    fn name(&self) -> &str {
        "get_token_info"
    }

    fn description(&self) -> &str {
        "Get detailed metadata and pricing information for a specific token on EVM chains."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "token_address": {
                    "type": "string",
                    "description": "The token contract address or 'native' for native tokens"
                },
                "chain_ids": {
                    "type": "string",
                    "description": "Chain IDs to search on (e.g., '1,137,8453' or 'all')",
                    "default": "all"
                }
            },
            "required": ["token_address"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: TokenInfoArgs = args::parse(arguments)?;
        let result = self
            .sim
            .get_json(
                &["v1", "evm", "token-info", &args.token_address],
                &[("chain_ids", args.chain_ids)],
            )
            .await;
        relay(self.name(), result)
    }
}

pub struct TokenHoldersTool {
    sim: Arc<SimClient>,
}

impl TokenHoldersTool {
    pub fn new(sim: Arc<SimClient>) -> Self {
        Self { sim }
    }
}

#[derive(Debug, Deserialize)]
struct TokenHoldersArgs {
    #[serde(deserialize_with = "lenient_u64")]
    chain_id: Option<u64>,
    token_address: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    limit: Option<u64>,
}

#[async_trait]
impl Tool for TokenHoldersTool {
    fn name(&self) -> &str {
        "get_token_holders"
    }

    fn description(&self) -> &str {
        "Get token holders for a specific ERC20 or ERC721 token, ranked by wallet value."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "chain_id": {
                    "type": "number",
                    "description": "The chain ID where the token exists (e.g., 1 for Ethereum)"
                },
                "token_address": {
                    "type": "string",
                    "description": "The token contract address"
                },
                "limit": {
                    "type": "number",
                    "description": "Maximum number of holders to return (default: 100)",
                    "default": 100
                }
            },
            "required": ["chain_id", "token_address"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: TokenHoldersArgs = args::parse(arguments)?;
        let chain_id = args
            .chain_id
            .ok_or_else(|| ToolError::InvalidArguments("chain_id must be a number".into()))?
            .to_string();
        let limit = clamp_limit(args.limit.unwrap_or(100), MAX_LIMIT);

        let result = self
            .sim
            .get_json(
                &["v1", "evm", "token-holders", &chain_id, &args.token_address],
                &[("limit", limit.to_string())],
            )
            .await;
        relay(self.name(), result)
    }
}

pub struct SvmTokenMetadataTool {
    sim: Arc<SimClient>,
}

impl SvmTokenMetadataTool {
    pub fn new(sim: Arc<SimClient>) -> Self {
        Self { sim }
    }
}

#[derive(Debug, Deserialize)]
struct SvmTokenMetadataArgs {
    mint: String,
}

#[async_trait]
impl Tool for SvmTokenMetadataTool {
    fn name(&self) -> &str {
        "get_svm_token_metadata"
    }

    fn description(&self) -> &str {
        "Get metadata for a Solana token mint address."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "mint": {
                    "type": "string",
                    "description": "The Solana token mint address (e.g., So11111111111111111111111111111111111111112)"
                }
            },
            "required": ["mint"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: SvmTokenMetadataArgs = args::parse(arguments)?;
        let result = self
            .sim
            .get_json(&["beta", "svm", "token-metadata", &args.mint], &[])
            .await;
        relay(self.name(), result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSim;

    #[tokio::test]
    async fn token_info_defaults_to_all_chains() {
        let mock = MockSim::start().await;
        let tool = TokenInfoTool::new(mock.client());

        tool.execute(serde_json::json!({"token_address": "native"}))
            .await
            .unwrap();
        let req = mock.last().await;
        assert_eq!(req.path, "/v1/evm/token-info/native");
        assert_eq!(req.query_param("chain_ids").as_deref(), Some("all"));
    }

    #[tokio::test]
    async fn holders_path_and_clamp() {
        let mock = MockSim::start().await;
        let tool = TokenHoldersTool::new(mock.client());

        tool.execute(serde_json::json!({"chain_id": 1.0, "token_address": "0xa0b8"}))
            .await
            .unwrap();
        let req = mock.last().await;
        assert_eq!(req.path, "/v1/evm/token-holders/1/0xa0b8");
        assert_eq!(req.query_param("limit").as_deref(), Some("10"));
    }

    #[tokio::test]
    async fn holders_require_chain_id() {
        let mock = MockSim::start().await;
        let tool = TokenHoldersTool::new(mock.client());

        let err = tool
            .execute(serde_json::json!({"token_address": "0xa0b8"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert_eq!(mock.count().await, 0);
    }

    #[tokio::test]
    async fn svm_metadata_path() {
        let mock = MockSim::start().await;
        let tool = SvmTokenMetadataTool::new(mock.client());

        tool.execute(serde_json::json!({"mint": "So11111111111111111111111111111111111111112"}))
            .await
            .unwrap();
        let req = mock.last().await;
        assert_eq!(
            req.path,
            "/beta/svm/token-metadata/So11111111111111111111111111111111111111112"
        );
        assert!(req.query.is_none());
    }
}
