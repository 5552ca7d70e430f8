//! Message types for a single conversation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ToolCall;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// System message (instructions to the LLM)
    System,
    /// User message
    User,
    /// Assistant (LLM) message
    Assistant,
    /// Output of a tool the assistant asked for
    ToolResult,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::ToolResult => write!(f, "tool-result"),
        }
    }
}

/// One turn in the exchange.
///
/// Messages are never edited after they are appended; a run only ever
/// extends its sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Message content (text, or serialized JSON for tool results)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Call id of the tool invocation this message answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    /// Tools requested by an assistant turn, in emitted order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Create a tool result message keyed by the originating call id
    pub fn tool_result(call_id: impl Into<String>, result: &Value) -> Self {
        Self {
            role: Role::ToolResult,
            content: Some(serde_json::to_string(result).unwrap_or_else(|_| "{}".to_string())),
            call_id: Some(call_id.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Assistant turn that requested tools. The matching tool-result
    /// messages must come after it.
    pub fn assistant_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            call_id: None,
            tool_calls,
        }
    }

    /// Whether this is an assistant turn that requested the call `call_id`
    pub fn requested(&self, call_id: &str) -> bool {
        self.role == Role::Assistant && self.tool_calls.iter().any(|c| c.id == call_id)
    }

    /// Read back the JSON payload of a tool result message.
    ///
    /// Returns `None` for other roles or when the content is not JSON.
    pub fn tool_payload(&self) -> Option<Value> {
        if self.role != Role::ToolResult {
            return None;
        }
        self.content
            .as_deref()
            .and_then(|c| serde_json::from_str(c).ok())
    }
}
