//! One chat turn: user message in, at most two completions, answer out.

use crate::dispatcher::ToolDispatcher;
use serde::Serialize;
use simchat_core::message::{Message, MessageToolCall};
use simchat_core::provider::{Provider, ProviderRequest, ProviderResponse, ToolChoice, ToolDefinition};
use simchat_core::session::Session;
use simchat_core::tool::ToolCall;
use simchat_core::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a finished turn hands back to the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The assistant's final text, if it produced any
    pub message: Option<String>,

    /// Tool calls executed during the turn, with parsed arguments
    pub tool_calls: Vec<ToolCall>,
}

/// Drives a session through a single request/response turn.
///
/// The first completion may ask for tools. Those run sequentially in the
/// order requested, then a second completion produces the answer. Tools the
/// second completion asks for are never run.
pub struct ChatAgent {
    provider: Arc<dyn Provider>,
    dispatcher: ToolDispatcher,

    /// Model for the first completion
    model: String,

    /// Model for the completion after tool results
    followup_model: String,

    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl ChatAgent {
    pub fn new(
        provider: Arc<dyn Provider>,
        dispatcher: ToolDispatcher,
        model: impl Into<String>,
    ) -> Self {
        let model = model.into();
        Self {
            provider,
            dispatcher,
            followup_model: model.clone(),
            model,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Use a different model for the completion that follows tool execution.
    pub fn with_followup_model(mut self, model: impl Into<String>) -> Self {
        self.followup_model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Run one turn against `session`.
    ///
    /// Messages appended before a failure stay in the session.
    pub async fn run_turn(&self, session: &mut Session, user_message: &str) -> Result<TurnOutcome> {
        info!(
            session_id = %session.id,
            messages = session.messages.len(),
            "Processing chat turn"
        );

        session.push(Message::user(user_message));
        let definitions = self.dispatcher.definitions();

        let first = self.complete(&self.model, session, &definitions).await?;
        if !first.message.requests_tools() {
            let text = first.message.content.clone();
            session.push(first.message);
            return Ok(TurnOutcome {
                message: text,
                tool_calls: Vec::new(),
            });
        }

        let requested = first.message.tool_calls.clone();
        debug!(session_id = %session.id, tool_count = requested.len(), "Executing tool calls");
        session.push(first.message);

        let mut executed = Vec::with_capacity(requested.len());
        for tc in &requested {
            let arguments = parse_arguments(tc)?;
            let output = self.dispatcher.invoke(&tc.name, &arguments).await;
            session.push(Message::tool_result(&tc.id, output));
            executed.push(ToolCall {
                id: tc.id.clone(),
                name: tc.name.clone(),
                arguments,
            });
        }

        let followup = self
            .complete(&self.followup_model, session, &definitions)
            .await?;
        let text = followup.message.content.clone();
        if followup.message.requests_tools() {
            warn!(
                session_id = %session.id,
                tool_count = followup.message.tool_calls.len(),
                "Follow-up completion requested tools; not executing"
            );
            // Unanswered tool calls would make the next request invalid.
            session.push(Message::assistant(text.clone().unwrap_or_default()));
        } else {
            session.push(followup.message);
        }

        Ok(TurnOutcome {
            message: text,
            tool_calls: executed,
        })
    }

    async fn complete(
        &self,
        model: &str,
        session: &Session,
        tools: &[ToolDefinition],
    ) -> Result<ProviderResponse> {
        let request = ProviderRequest {
            model: model.to_string(),
            messages: session.messages.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: tools.to_vec(),
            tool_choice: Some(ToolChoice::Auto),
        };

        let response = self.provider.complete(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                session_id = %session.id,
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion received"
            );
        }
        Ok(response)
    }
}

/// Parse the JSON text the model produced for a tool call. An empty string
/// means no arguments.
fn parse_arguments(tc: &MessageToolCall) -> Result<serde_json::Value> {
    if tc.arguments.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_str(&tc.arguments).map_err(|e| Error::InvalidToolArguments {
        tool: tc.name.clone(),
        reason: e.to_string(),
    })
}
