//! The Sim data-fetch tools the chat model may call.
//!
//! Each tool performs exactly one request against the Sim API and hands the
//! upstream JSON back unchanged (compacted). Page sizes requested by the
//! model are clamped so a single answer cannot pull huge result sets into
//! the conversation.

pub mod activity;
pub mod args;
pub mod balances;
pub mod chains;
pub mod collectibles;
pub mod tokens;

use simchat_core::error::{SimError, ToolError};
use simchat_core::tool::{ToolRegistry, ToolResult};
use simchat_sim::SimClient;
use std::sync::Arc;

/// Upper bound on `limit` for the EVM list endpoints.
pub const MAX_LIMIT: u64 = 10;

/// Create the registry with all nine Sim tools, in catalog order.
pub fn default_registry(sim: Arc<SimClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(balances::TokenBalancesTool::new(sim.clone())));
    registry.register(Box::new(activity::WalletActivityTool::new(sim.clone())));
    registry.register(Box::new(collectibles::NftCollectiblesTool::new(sim.clone())));
    registry.register(Box::new(tokens::TokenInfoTool::new(sim.clone())));
    registry.register(Box::new(tokens::TokenHoldersTool::new(sim.clone())));
    registry.register(Box::new(activity::TransactionsTool::new(sim.clone())));
    registry.register(Box::new(chains::SupportedChainsTool::new(sim.clone())));
    registry.register(Box::new(balances::SvmTokenBalancesTool::new(sim.clone())));
    registry.register(Box::new(tokens::SvmTokenMetadataTool::new(sim)));
    registry
}

/// Turn an upstream response into a tool result.
pub(crate) fn relay(
    tool: &str,
    result: Result<serde_json::Value, SimError>,
) -> Result<ToolResult, ToolError> {
    result
        .map(ToolResult::json)
        .map_err(|e| ToolError::ExecutionFailed {
            tool_name: tool.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
pub(crate) mod testing {
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::{Json, Router};
    use simchat_sim::SimClient;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    pub const API_KEY: &str = "test-sim-key";

    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub path: String,
        pub query: Option<String>,
        pub api_key: Option<String>,
    }

    impl RecordedRequest {
        pub fn query_param(&self, name: &str) -> Option<String> {
            self.query.as_deref()?.split('&').find_map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (k == name).then(|| v.replace("%2C", ","))
            })
        }
    }

    /// A local stand-in for the Sim API that records every request and
    /// echoes its path back as JSON.
    pub struct MockSim {
        base_url: String,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl MockSim {
        pub async fn start() -> Self {
            Self::start_with_status(StatusCode::OK).await
        }

        pub async fn start_with_status(status: StatusCode) -> Self {
            let requests = Arc::new(Mutex::new(Vec::new()));
            let recorder = requests.clone();
            let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap| {
                let recorder = recorder.clone();
                async move {
                    recorder.lock().await.push(RecordedRequest {
                        path: uri.path().to_string(),
                        query: uri.query().map(str::to_string),
                        api_key: headers
                            .get("x-sim-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                    });
                    (status, Json(serde_json::json!({ "path": uri.path() })))
                }
            });

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                base_url: format!("http://{addr}"),
                requests,
            }
        }

        pub fn client(&self) -> Arc<SimClient> {
            Arc::new(SimClient::new(&self.base_url, API_KEY, Duration::from_secs(5)).unwrap())
        }

        pub async fn last(&self) -> RecordedRequest {
            self.requests.lock().await.last().cloned().expect("no request recorded")
        }

        pub async fn count(&self) -> usize {
            self.requests.lock().await.len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn registry_has_nine_tools_in_order() {
        let sim = Arc::new(
            SimClient::new("https://api.sim.dune.com", "k", Duration::from_secs(1)).unwrap(),
        );
        let registry = default_registry(sim);
        assert_eq!(
            registry.names(),
            vec![
                "get_token_balances",
                "get_wallet_activity",
                "get_nft_collectibles",
                "get_token_info",
                "get_token_holders",
                "get_transactions",
                "get_supported_chains",
                "get_svm_token_balances",
                "get_svm_token_metadata",
            ]
        );
    }

    #[test]
    fn every_schema_is_a_closed_object() {
        let sim = Arc::new(
            SimClient::new("https://api.sim.dune.com", "k", Duration::from_secs(1)).unwrap(),
        );
        for def in default_registry(sim).definitions() {
            assert_eq!(def.parameters["type"], "object", "{}", def.name);
            assert_eq!(def.parameters["additionalProperties"], false, "{}", def.name);
            assert!(!def.description.is_empty());
        }
    }
}
