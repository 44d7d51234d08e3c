//! HTTP servers for simchat.
//!
//! Two independent Axum servers share this crate:
//!
//! - the **chat server** ([`chat_router`]): `POST /chat` runs one turn of the
//!   tool-calling loop against an in-memory session
//! - the **dashboard server** ([`dashboard_router`]): a server-rendered view
//!   of a wallet's balances, activity and collectibles
//!
//! Both serve `GET /health` and their frontend assets from the binary.

pub mod chat;
pub mod dashboard;
pub mod format;
pub mod frontend;

pub use chat::{ChatState, chat_router};
pub use dashboard::{DashboardState, dashboard_router};

use axum::response::Json;
use serde::Serialize;
use simchat_agent::{ChatAgent, ToolDispatcher};
use simchat_config::AppConfig;
use simchat_core::session::SessionStore;
use simchat_providers::OpenAiCompatProvider;
use simchat_sessions::{InMemorySessionStore, SessionSweeper};
use simchat_sim::{NftMetadataClient, SimClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Start the chat server and run until Ctrl-C.
///
/// Fails fast when the Sim or completion API key is missing.
pub async fn start_chat(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let sim_key = config.require_sim_api_key()?;
    let completion_key = config.require_completion_api_key()?;

    let sim = Arc::new(SimClient::new(
        &config.sim.base_url,
        sim_key,
        Duration::from_secs(config.sim.timeout_secs),
    )?);
    let provider = Arc::new(OpenAiCompatProvider::new(
        "openai",
        &config.completion.api_url,
        completion_key,
        Duration::from_secs(config.completion.timeout_secs),
    )?);

    let registry = simchat_tools::default_registry(sim);
    info!(tools = registry.len(), "Tool registry ready");
    let dispatcher = ToolDispatcher::new(Arc::new(registry));

    let mut agent = ChatAgent::new(provider, dispatcher, &config.completion.model)
        .with_followup_model(&config.completion.followup_model)
        .with_max_tokens(config.completion.max_tokens);
    if let Some(temperature) = config.completion.temperature {
        agent = agent.with_temperature(temperature);
    }

    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(
        config.system_prompt(),
        config.chat.max_messages,
        minutes(config.chat.session_idle_minutes),
    ));
    let sweeper = SessionSweeper::new(
        sessions.clone(),
        minutes(config.chat.sweep_interval_minutes),
    )
    .start();

    let app = chat_router(ChatState {
        agent: Arc::new(agent),
        sessions,
    });

    let addr = format!("{}:{}", config.chat.host, config.chat.port);
    info!(
        addr = %addr,
        model = %config.completion.model,
        followup_model = %config.completion.followup_model,
        "Chat server starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.stop().await;
    info!("Chat server stopped");
    Ok(())
}

/// Start the wallet dashboard server and run until Ctrl-C.
///
/// Without an NFT metadata key, collectibles are shown without images.
pub async fn start_dashboard(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let sim_key = config.require_sim_api_key()?;
    let sim = Arc::new(SimClient::new(
        &config.sim.base_url,
        sim_key,
        Duration::from_secs(config.sim.timeout_secs),
    )?);

    let nft = match config.nft_metadata.api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => Some(Arc::new(NftMetadataClient::new(
            &config.nft_metadata.base_url,
            key,
            Duration::from_secs(config.sim.timeout_secs),
        )?)),
        None => {
            warn!("No NFT metadata API key configured; collectibles will render without images");
            None
        }
    };

    let state = DashboardState::new(sim, nft, config.dashboard.clone())?;
    let app = dashboard_router(Arc::new(state));

    let addr = format!("{}:{}", config.dashboard.host, config.dashboard.port);
    info!(addr = %addr, "Dashboard server starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard server stopped");
    Ok(())
}

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m.saturating_mul(60))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub(crate) async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
