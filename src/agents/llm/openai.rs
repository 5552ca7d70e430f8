//! OpenAI LLM Provider using the Responses API

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;

use super::{ChatOptions, CompletionResponse, ContinuationToken, LlmProvider, TokenUsage};
use crate::agents::config::LlmProviderConfig;
use crate::agents::domain::{Message, Role, ToolCall};
use crate::agents::error::{LlmError, LlmResult};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI LLM Provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider from configuration.
    ///
    /// The API key is read from the environment variable named by
    /// `config.api_key_env`.
    pub fn new(config: &LlmProviderConfig, timeout: Duration) -> LlmResult<Self> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LlmError::Authentication(format!(
                    "Environment variable {} not set",
                    config.api_key_env
                ))
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self::with_api_key(api_key, base_url, timeout)
    }

    /// Create a provider with an explicit key and endpoint
    pub fn with_api_key(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the request body for the Responses API
    fn build_request_body(&self, messages: &[Message], options: &ChatOptions) -> Value {
        let mut body = json!({
            "model": options.model,
            "input": Self::convert_messages(messages, options.continuation.is_none()),
            "temperature": options.temperature,
        });

        if !options.tools.is_empty() {
            body["tools"] = json!(options
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters_schema(),
                    })
                })
                .collect::<Vec<_>>());
        }

        if let Some(token) = &options.continuation {
            body["previous_response_id"] = json!(token.as_str());
        }

        if let Some(max_tokens) = options.max_output_tokens {
            body["max_output_tokens"] = json!(max_tokens);
        }

        body
    }

    /// Convert internal messages to Responses API input items.
    ///
    /// Assistant turns that requested tools become `function_call` items
    /// ahead of their outputs. With `replay_calls` off (a
    /// `previous_response_id` is sent) those turns are skipped, since the
    /// referenced response already holds them.
    fn convert_messages(messages: &[Message], replay_calls: bool) -> Vec<Value> {
        messages
            .iter()
            .flat_map(|m| match m.role {
                Role::ToolResult => vec![json!({
                    "type": "function_call_output",
                    "call_id": m.call_id.clone().unwrap_or_default(),
                    "output": m.content.clone().unwrap_or_default(),
                })],
                Role::Assistant if !m.tool_calls.is_empty() => {
                    if !replay_calls {
                        return Vec::new();
                    }
                    let text = m
                        .content
                        .iter()
                        .map(|c| json!({ "role": "assistant", "content": c }));
                    let calls = m.tool_calls.iter().map(|c| {
                        json!({
                            "type": "function_call",
                            "call_id": c.id,
                            "name": c.name,
                            "arguments": c.arguments,
                        })
                    });
                    text.chain(calls).collect()
                }
                Role::System | Role::User | Role::Assistant => vec![json!({
                    "role": m.role.to_string(),
                    "content": m.content.clone().unwrap_or_default(),
                })],
            })
            .collect()
    }

    /// Normalize a Responses API reply
    fn parse_response(response: ResponsesApiResponse) -> CompletionResponse {
        let mut content = None;
        let mut tool_calls = Vec::new();

        for item in response.output {
            match item {
                OutputItem::FunctionCall {
                    call_id,
                    name,
                    arguments,
                } => tool_calls.push(ToolCall::new(call_id, name, arguments)),
                OutputItem::Message { content: parts, text } => {
                    let part_text = parts.into_iter().find_map(|p| p.text);
                    if let Some(t) = part_text.or(text) {
                        content = Some(t);
                    }
                }
                OutputItem::Text { text } => {
                    if text.is_some() {
                        content = text;
                    }
                }
                OutputItem::Unknown => {}
            }
        }

        let usage = response.usage.map(|u| TokenUsage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
            total_tokens: u.total_tokens,
        });

        CompletionResponse {
            content,
            tool_calls,
            continuation: response.id.map(ContinuationToken::new),
            usage,
        }
    }

    fn status_error(status: reqwest::StatusCode, body: String) -> LlmError {
        match status.as_u16() {
            429 => LlmError::RateLimited(body),
            401 | 403 => LlmError::Authentication(body),
            code => LlmError::Api {
                status: code,
                message: body,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &ChatOptions,
    ) -> LlmResult<CompletionResponse> {
        if messages.is_empty() {
            return Err(LlmError::InvalidRequest("messages must not be empty".to_string()));
        }

        let body = self.build_request_body(messages, options);
        tracing::debug!(
            model = %options.model,
            tools = options.tools.len(),
            "sending Responses API request"
        );

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, error_text));
        }

        let parsed: ResponsesApiResponse = response.json().await.map_err(|e| {
            LlmError::Parse(format!("Failed to parse response: {}", e))
        })?;

        let completion = Self::parse_response(parsed);
        if let Some(usage) = &completion.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Responses API usage"
            );
        }
        Ok(completion)
    }
}

// Responses API types

#[derive(Debug, Deserialize)]
struct ResponsesApiResponse {
    id: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
    usage: Option<ResponsesUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputItem {
    FunctionCall {
        call_id: String,
        name: String,
        #[serde(default)]
        arguments: String,
    },
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
        #[serde(default)]
        text: Option<String>,
    },
    Text {
        #[serde(default)]
        text: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponsesUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::domain::ToolDefinition;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::with_api_key("sk-test", "http://localhost:1/v1/", Duration::from_secs(5))
            .unwrap()
    }

    fn parse(value: Value) -> CompletionResponse {
        OpenAiProvider::parse_response(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(provider().base_url, "http://localhost:1/v1");
    }

    #[test]
    fn request_body_includes_tools_and_continuation() {
        let options = ChatOptions::new("gpt-4o-mini", 0.7)
            .with_tools(vec![ToolDefinition::new(
                "get_github_repos",
                "List repositories",
                json!({}),
            )])
            .continued_from(Some(ContinuationToken::new("resp_42")));
        let messages = vec![Message::system("be brief"), Message::user("hi")];

        let body = provider().build_request_body(&messages, &options);

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["previous_response_id"], "resp_42");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["name"], "get_github_repos");
        assert_eq!(body["tools"][0]["parameters"]["type"], "object");
        assert_eq!(body["input"][0]["role"], "system");
        assert_eq!(body["input"][1]["content"], "hi");
        assert!(body.get("max_output_tokens").is_none());
    }

    #[test]
    fn request_body_omits_empty_tools() {
        let options = ChatOptions::new("m", 1.0);
        let body = provider().build_request_body(&[Message::user("hi")], &options);
        assert!(body.get("tools").is_none());
        assert!(body.get("previous_response_id").is_none());
    }

    #[test]
    fn tool_results_become_function_call_output_items() {
        let items = OpenAiProvider::convert_messages(
            &[Message::tool_result("call_7", &json!({ "error": "rate limited" }))],
            true,
        );
        assert_eq!(items[0]["type"], "function_call_output");
        assert_eq!(items[0]["call_id"], "call_7");
        assert_eq!(items[0]["output"], r#"{"error":"rate limited"}"#);
    }

    fn tool_round() -> Vec<Message> {
        vec![
            Message::user("repos?"),
            Message::assistant_tool_calls(
                None,
                vec![ToolCall::new("call_1", "get_github_repos", "{}")],
            ),
            Message::tool_result("call_1", &json!([])),
        ]
    }

    #[test]
    fn calls_are_replayed_before_their_outputs_without_continuation() {
        let body = provider().build_request_body(&tool_round(), &ChatOptions::new("m", 0.7));
        let input = body["input"].as_array().unwrap();

        assert_eq!(input.len(), 3);
        assert_eq!(input[1]["type"], "function_call");
        assert_eq!(input[1]["call_id"], "call_1");
        assert_eq!(input[1]["name"], "get_github_repos");
        assert_eq!(input[1]["arguments"], "{}");
        assert_eq!(input[2]["type"], "function_call_output");
        assert_eq!(input[2]["call_id"], "call_1");
    }

    #[test]
    fn continued_requests_leave_calls_to_the_referenced_response() {
        let options =
            ChatOptions::new("m", 0.7).continued_from(Some(ContinuationToken::new("resp_1")));
        let body = provider().build_request_body(&tool_round(), &options);
        let input = body["input"].as_array().unwrap();

        assert_eq!(input.len(), 2);
        assert_eq!(input[1]["type"], "function_call_output");
    }

    #[test]
    fn assistant_text_alongside_calls_is_kept() {
        let turn = Message::assistant_tool_calls(
            Some("Let me look.".to_string()),
            vec![ToolCall::new("c1", "get_github_profile", "")],
        );
        let items = OpenAiProvider::convert_messages(&[turn], true);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["role"], "assistant");
        assert_eq!(items[0]["content"], "Let me look.");
        assert_eq!(items[1]["type"], "function_call");
    }

    #[test]
    fn parses_function_calls_in_order() {
        let response = parse(json!({
            "id": "resp_1",
            "output": [
                { "type": "function_call", "call_id": "c1",
                  "name": "get_github_profile", "arguments": "{}" },
                { "type": "reasoning", "summary": [] },
                { "type": "function_call", "call_id": "c2",
                  "name": "get_github_repos", "arguments": "{}" }
            ],
            "usage": { "input_tokens": 10, "output_tokens": 5, "total_tokens": 15 }
        }));

        assert_eq!(response.content, None);
        let names: Vec<_> = response.tool_calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["get_github_profile", "get_github_repos"]);
        assert_eq!(response.tool_calls[1].id, "c2");
        assert_eq!(response.continuation, Some(ContinuationToken::new("resp_1")));
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(15));
    }

    #[test]
    fn parses_message_text() {
        let response = parse(json!({
            "id": "resp_2",
            "output": [
                { "type": "message", "role": "assistant",
                  "content": [
                      { "type": "output_text", "text": "Here are the repos", "annotations": [] }
                  ] }
            ]
        }));

        assert_eq!(response.content.as_deref(), Some("Here are the repos"));
        assert!(response.tool_calls.is_empty());
        assert!(response.usage.is_none());
    }

    #[test]
    fn parses_bare_text_item() {
        let response = parse(json!({ "output": [{ "type": "text", "text": "hello" }] }));
        assert_eq!(response.content.as_deref(), Some("hello"));
        assert!(response.continuation.is_none());
    }

    #[test]
    fn empty_output_is_an_empty_answer() {
        let response = parse(json!({ "id": "resp_3", "output": [] }));
        assert_eq!(response.content, None);
        assert!(response.tool_calls.is_empty());
    }

    #[test]
    fn status_errors_are_classified() {
        assert!(matches!(
            OpenAiProvider::status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, String::new()),
            LlmError::RateLimited(_)
        ));
        assert!(matches!(
            OpenAiProvider::status_error(reqwest::StatusCode::UNAUTHORIZED, String::new()),
            LlmError::Authentication(_)
        ));
        assert!(matches!(
            OpenAiProvider::status_error(reqwest::StatusCode::BAD_GATEWAY, String::new()),
            LlmError::Api { status: 502, .. }
        ));
    }

    #[tokio::test]
    async fn empty_messages_are_rejected_without_a_call() {
        let result = provider().complete(&[], &ChatOptions::new("m", 0.0)).await;
        assert!(matches!(result, Err(LlmError::InvalidRequest(_))));
    }
}
