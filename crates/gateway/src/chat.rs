//! The chat server: `POST /chat` runs one turn of the tool-calling loop
//! against the caller's session.

use crate::frontend;
use crate::health_handler;
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use simchat_agent::ChatAgent;
use simchat_core::session::{SessionId, SessionStore};
use simchat_core::tool::ToolCall;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared state for the chat handlers.
#[derive(Clone)]
pub struct ChatState {
    pub agent: Arc<ChatAgent>,
    pub sessions: Arc<dyn SessionStore>,
}

/// Build the chat server router: `POST /chat`, the chat page and `/health`.
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .merge(frontend::chat_page_router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,

    /// Omitted on the first message of a conversation
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub function_calls: Vec<ToolCall>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

fn message_required() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Message is required".into(),
            details: None,
        }),
    )
        .into_response()
}

async fn chat_handler(
    State(state): State<ChatState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected malformed chat request");
            return message_required();
        }
    };

    let Some(message) = request.message.filter(|m| !m.trim().is_empty()) else {
        return message_required();
    };

    let session_id = request
        .session_id
        .filter(|id| !id.is_empty())
        .map(|id| SessionId::from(&id))
        .unwrap_or_default();

    // Held for the whole turn: concurrent requests for one session queue here.
    let mut session = state.sessions.get_or_create(&session_id).await;

    match state.agent.run_turn(&mut session, &message).await {
        Ok(outcome) => {
            info!(
                session_id = %session_id,
                tool_calls = outcome.tool_calls.len(),
                "Chat turn complete"
            );
            Json(ChatResponse {
                message: outcome.message,
                session_id: session_id.to_string(),
                function_calls: outcome.tool_calls,
            })
            .into_response()
        }
        Err(e) => {
            error!(session_id = %session_id, error = %e, "Chat turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "An error occurred while processing your request".into(),
                    details: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
