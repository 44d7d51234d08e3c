//! Wallet balance lookups: EVM (`/v1/evm/balances`) and SVM (`/beta/svm/balances`).

use crate::args::{self, clamp_limit, lenient_u64};
use crate::relay;
use async_trait::async_trait;
use serde::Deserialize;
use simchat_core::error::ToolError;
use simchat_core::tool::{Tool, ToolResult};
use simchat_sim::SimClient;
use std::sync::Arc;

pub struct TokenBalancesTool {
    sim: Arc<SimClient>,
}

impl TokenBalancesTool {
    pub fn new(sim: Arc<SimClient>) -> Self {
        Self { sim }
    }
}

#[derive(Debug, Deserialize)]
struct TokenBalancesArgs {
    address: String,
    #[serde(default = "default_true")]
    exclude_spam_tokens: bool,
}

fn default_true() -> bool {
    true
}

#[async_trait]
impl Tool for TokenBalancesTool {
    fn name(&self) -> &str {
        "get_token_balances"
    }

    fn description(&self) -> &str {
        "Get realtime token balances for an EVM wallet address across multiple chains. \
         Returns native and ERC20 token balances with USD values."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "The wallet address to get balances for (e.g., 0xd8da6bf26964af9d7eed9e03e53415d37aa96045)"
                },
                "exclude_spam_tokens": {
                    "type": "boolean",
                    "description": "Whether to exclude spam tokens from results",
                    "default": true
                }
            },
            "required": ["address"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: TokenBalancesArgs = args::parse(arguments)?;

        let mut query = vec![("metadata", "url,logo".to_string())];
        if args.exclude_spam_tokens {
            query.push(("exclude_spam_tokens", "true".to_string()));
        }

        let result = self
            .sim
            .get_json(&["v1", "evm", "balances", &args.address], &query)
            .await;
        relay(self.name(), result)
    }
}

pub struct SvmTokenBalancesTool {
    sim: Arc<SimClient>,
}

impl SvmTokenBalancesTool {
    pub fn new(sim: Arc<SimClient>) -> Self {
        Self { sim }
    }
}

#[derive(Debug, Deserialize)]
struct SvmTokenBalancesArgs {
    address: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    limit: Option<u64>,
    #[serde(default)]
    chains: Option<String>,
}

const SVM_MAX_LIMIT: u64 = 20;

#[async_trait]
impl Tool for SvmTokenBalancesTool {
    fn name(&self) -> &str {
        "get_svm_token_balances"
    }

    fn description(&self) -> &str {
        "Get token balances for a Solana (SVM) address. Returns native and SPL token balances with USD values."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "string",
                    "description": "The Solana wallet address to get balances for (e.g., DYw8jCTfwHNRJhhmFcbXvVDTqWMEVFBX6ZKUmG5CNSKK)"
                },
                "limit": {
                    "type": "number",
                    "description": "Maximum number of balances to return (default: 100)",
                    "default": 100
                },
                "chains": {
                    "type": "string",
                    "description": "Comma-separated list of chains to include, or 'all' for all supported chains",
                    "default": "all"
                }
            },
            "required": ["address"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: SvmTokenBalancesArgs = args::parse(arguments)?;

        let mut query = Vec::new();
        let chains = args.chains.unwrap_or_else(|| "all".into());
        if !chains.is_empty() {
            query.push(("chains", chains));
        }
        // A zero limit means "let the API decide".
        let limit = args.limit.unwrap_or(100);
        if limit > 0 {
            query.push(("limit", clamp_limit(limit, SVM_MAX_LIMIT).to_string()));
        }

        let result = self
            .sim
            .get_json(&["beta", "svm", "balances", &args.address], &query)
            .await;
        relay(self.name(), result)
    }
}
