//! `POST /api/chat`, the endpoint the site's chat widget calls

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::agents::core::ChatOrchestrator;
use crate::agents::domain::ToolCall;
use crate::agents::error::{AgentError, AgentResult, LlmError};
use crate::agents::llm::{ChatOptions, CompletionResponse, TokenUsage};
use crate::agents::tools::ToolRegistry;

pub const MESSAGE_REQUIRED: &str = "Query string is required.";

/// Shared, read-only state for the chat endpoint
#[derive(Clone)]
pub struct ChatState {
    pub orchestrator: Arc<ChatOrchestrator>,
    pub tools: Arc<ToolRegistry>,
    pub system_prompt: Option<Arc<str>>,
    /// Model settings; `tools` is filled from the registry per request
    pub options: ChatOptions,
    /// Tools exposed to the model; every registered tool when `None`
    pub exposed_tools: Option<Arc<[String]>>,
}

impl ChatState {
    pub fn new(
        orchestrator: Arc<ChatOrchestrator>,
        tools: Arc<ToolRegistry>,
        system_prompt: Option<String>,
        options: ChatOptions,
    ) -> Self {
        Self {
            orchestrator,
            tools,
            system_prompt: system_prompt.map(Arc::from),
            options,
            exposed_tools: None,
        }
    }

    /// Expose only `names` instead of the whole registry
    pub fn with_exposed_tools(mut self, names: Vec<String>) -> Self {
        self.exposed_tools = Some(names.into());
        self
    }

    fn options_for_request(&self) -> AgentResult<ChatOptions> {
        let tools = match &self.exposed_tools {
            Some(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                self.tools.select(&names)?
            }
            None => self.tools.definitions(),
        };
        Ok(self.options.clone().with_tools(tools))
    }
}

/// Successful reply body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl From<CompletionResponse> for ChatReply {
    fn from(response: CompletionResponse) -> Self {
        Self {
            content: response.content,
            tool_calls: response.tool_calls,
            response_id: response.continuation.map(|t| t.as_str().to_string()),
            usage: response.usage,
        }
    }
}

/// Handle one chat message
pub async fn chat(
    State(state): State<ChatState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let message = match body {
        Ok(Json(value)) => extract_message(&value),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected chat body");
            Err(AgentError::Validation(MESSAGE_REQUIRED.to_string()))
        }
    };

    let message = match message {
        Ok(message) => message,
        Err(e) => return error_response(&e),
    };

    let options = match state.options_for_request() {
        Ok(options) => options,
        Err(e) => {
            tracing::error!(error = %e, "cannot resolve exposed tools");
            return error_response(&e);
        }
    };

    let result = state
        .orchestrator
        .respond(&message, state.system_prompt.as_deref(), options, &state.tools)
        .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(ChatReply::from(response))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error in POST /api/chat");
            error_response(&e)
        }
    }
}

/// The `message` field, which must be a non-empty string
fn extract_message(body: &Value) -> Result<String, AgentError> {
    match body.get("message").and_then(Value::as_str) {
        Some(message) if !message.is_empty() => Ok(message.to_string()),
        _ => Err(AgentError::Validation(MESSAGE_REQUIRED.to_string())),
    }
}

fn error_response(error: &AgentError) -> Response {
    (status_for(error), Json(json!({ "error": error.public_message() }))).into_response()
}

/// HTTP status for an orchestration failure
pub fn status_for(error: &AgentError) -> StatusCode {
    match error {
        AgentError::Validation(_) => StatusCode::BAD_REQUEST,
        AgentError::Llm(LlmError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
        AgentError::Llm(LlmError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        AgentError::Llm(LlmError::Api { status, .. }) => StatusCode::from_u16(*status)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::BAD_GATEWAY),
        AgentError::Llm(LlmError::Network(_))
        | AgentError::Llm(LlmError::Parse(_))
        | AgentError::Llm(LlmError::Authentication(_)) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
