//! LLM provider interface
//!
//! The provider turns an ordered message sequence plus [`ChatOptions`] into
//! exactly one call against the completion backend and normalizes the reply
//! into a [`CompletionResponse`].

mod openai;

pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::agents::config::LlmProviderConfig;
use crate::agents::domain::{Message, ToolCall, ToolDefinition};
use crate::agents::error::LlmResult;

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Complete a request.
    ///
    /// Issues exactly one backend call and never retries; `messages` must be
    /// non-empty.
    async fn complete(
        &self,
        messages: &[Message],
        options: &ChatOptions,
    ) -> LlmResult<CompletionResponse>;
}

/// Opaque handle letting the backend reuse context from an earlier response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-run options for a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Backend model identifier
    pub model: String,
    /// Sampling temperature in [0, 2]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Tools exposed to the model for this run
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
    /// Prior-context handle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<ContinuationToken>,
}

impl ChatOptions {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            temperature,
            max_output_tokens: None,
            tools: Vec::new(),
            continuation: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_max_output_tokens(mut self, max: Option<u32>) -> Self {
        self.max_output_tokens = max;
        self
    }

    /// Copy of these options pointing at a different continuation token
    pub fn continued_from(&self, continuation: Option<ContinuationToken>) -> Self {
        Self {
            continuation,
            ..self.clone()
        }
    }
}

/// Normalized result of one provider call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Final answer text, if the model produced one
    pub content: Option<String>,
    /// Tool invocations requested by the model, in emitted order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Handle for the next call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<ContinuationToken>,
    /// Token usage (telemetry only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Plain text answer with no tool calls
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Response that only requests tools
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Default::default()
        }
    }

    pub fn with_continuation(mut self, token: impl Into<String>) -> Self {
        self.continuation = Some(ContinuationToken::new(token));
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Create the LLM provider from configuration
pub fn create_provider(
    config: &LlmProviderConfig,
    timeout: Duration,
) -> LlmResult<Arc<dyn LlmProvider>> {
    let provider = OpenAiProvider::new(config, timeout)?;
    Ok(Arc::new(provider))
}
