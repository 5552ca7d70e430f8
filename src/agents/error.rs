//! Error types for the chat agent

use thiserror::Error;

/// Why a chat run failed
#[derive(Debug, Error)]
pub enum AgentError {
    /// Inbound request rejected before any model call
    #[error("invalid chat request: {0}")]
    Validation(String),

    /// Startup wiring is inconsistent, e.g. a declared tool has no executor
    #[error("misconfigured chat agent: {0}")]
    Configuration(String),

    /// The model asked for a tool that has no registered executor
    #[error("model requested unknown tool `{0}`")]
    ToolNotFound(String),

    #[error("completion backend failed: {0}")]
    Llm(#[from] LlmError),
}

impl AgentError {
    /// Short message that is safe to hand back to a browser.
    ///
    /// Upstream payloads and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AgentError::Validation(msg) => msg.clone(),
            AgentError::Llm(LlmError::RateLimited(_)) => {
                "The assistant is busy right now. Please try again in a moment.".to_string()
            }
            AgentError::Llm(LlmError::Timeout) => {
                "The assistant took too long to respond.".to_string()
            }
            AgentError::Llm(_) => "The assistant is unavailable right now.".to_string(),
            AgentError::Configuration(_) | AgentError::ToolNotFound(_) => {
                "Internal Server Error".to_string()
            }
        }
    }
}

/// Failure of a single completion backend call
#[derive(Debug, Error)]
pub enum LlmError {
    /// Non-success HTTP status other than rate limiting or auth
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// HTTP 429; carries the upstream body for logging
    #[error("rate limited by backend: {0}")]
    RateLimited(String),

    /// Missing API key, or the backend rejected it
    #[error("backend authentication failed: {0}")]
    Authentication(String),

    #[error("could not reach backend: {0}")]
    Network(String),

    /// Reply body did not match the Responses API shape
    #[error("unreadable backend reply: {0}")]
    Parse(String),

    /// Refused locally, never sent
    #[error("request not sent: {0}")]
    InvalidRequest(String),

    #[error("backend call timed out")]
    Timeout,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        match err {
            e if e.is_timeout() => LlmError::Timeout,
            e if e.is_decode() => LlmError::Parse(e.to_string()),
            e => LlmError::Network(e.to_string()),
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;

pub type LlmResult<T> = Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_message_hides_upstream_payload() {
        let err = AgentError::Llm(LlmError::Api {
            status: 500,
            message: "{\"error\":{\"message\":\"secret internals\"}}".to_string(),
        });
        let msg = err.public_message();
        assert!(!msg.contains("secret"));
        assert_eq!(msg, "The assistant is unavailable right now.");
    }

    #[test]
    fn public_message_for_missing_tool_is_generic() {
        let err = AgentError::ToolNotFound("get_weather".to_string());
        assert_eq!(err.public_message(), "Internal Server Error");
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = AgentError::Validation("Query string is required.".to_string());
        assert_eq!(err.public_message(), "Query string is required.");
    }

    #[test]
    fn display_names_the_unknown_tool() {
        let err = AgentError::ToolNotFound("get_weather".to_string());
        assert_eq!(err.to_string(), "model requested unknown tool `get_weather`");
    }
}
