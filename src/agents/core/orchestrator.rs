//! Tool-augmented conversation loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::agents::domain::{Message, ToolCall, ToolCallResult};
use crate::agents::error::{AgentError, AgentResult};
use crate::agents::llm::{ChatOptions, CompletionResponse, ContinuationToken, LlmProvider};
use crate::agents::tools::{Tool, ToolRegistry};

/// Drives one user message through the model, executing requested tools
/// until the model answers or the iteration cap is hit.
pub struct ChatOrchestrator {
    llm: Arc<dyn LlmProvider>,
    max_iterations: u32,
    tool_timeout: Duration,
}

impl ChatOrchestrator {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 5;
    pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            tool_timeout: Self::DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Answer `user_message`.
    ///
    /// With no tools in `options` this is a single provider call whose
    /// outcome is returned verbatim. Otherwise the model may request tools
    /// from `tools`; a request for an unregistered tool fails the whole run,
    /// while a tool that errors or times out is reported back to the model
    /// as `{"error": ...}`.
    pub async fn respond(
        &self,
        user_message: &str,
        system_preamble: Option<&str>,
        options: ChatOptions,
        tools: &ToolRegistry,
    ) -> AgentResult<CompletionResponse> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("chat_run", %run_id);

        async move {
            let messages = initial_messages(user_message, system_preamble);

            if options.tools.is_empty() {
                debug!("no tools exposed, single completion");
                return Ok(self.llm.complete(&messages, &options).await?);
            }

            tools.ensure_covers(&options.tools)?;
            self.run_tool_loop(messages, options, tools).await
        }
        .instrument(span)
        .await
    }

    async fn run_tool_loop(
        &self,
        mut messages: Vec<Message>,
        options: ChatOptions,
        tools: &ToolRegistry,
    ) -> AgentResult<CompletionResponse> {
        let mut continuation: Option<ContinuationToken> = options.continuation.clone();

        for iteration in 0..self.max_iterations {
            let response = self
                .llm
                .complete(&messages, &options.continued_from(continuation.clone()))
                .await?;

            if !response.has_tool_calls() {
                info!(iterations = iteration + 1, "model answered");
                return Ok(response);
            }

            debug!(
                iteration = iteration + 1,
                tools = ?response.tool_calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                "model requested tools"
            );

            if response.continuation.is_some() {
                continuation = response.continuation.clone();
            }

            let results = self.execute_tool_calls(&response.tool_calls, tools).await?;
            let turn = Message::assistant_tool_calls(response.content, response.tool_calls);
            messages = append_tool_round(messages, turn, &results);
        }

        warn!(
            max_iterations = self.max_iterations,
            "iteration cap reached, requesting final answer"
        );
        Ok(self
            .llm
            .complete(&messages, &options.continued_from(continuation))
            .await?)
    }

    /// Execute every call of one model step.
    ///
    /// All names are resolved before anything runs. Executions are
    /// concurrent; results come back in call order.
    async fn execute_tool_calls(
        &self,
        calls: &[ToolCall],
        tools: &ToolRegistry,
    ) -> AgentResult<Vec<ToolCallResult>> {
        let resolved = calls
            .iter()
            .map(|call| {
                tools
                    .get(&call.name)
                    .map(|tool| (call, tool))
                    .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))
            })
            .collect::<AgentResult<Vec<_>>>()?;

        let executions = resolved
            .into_iter()
            .map(|(call, tool)| self.execute_one(call, tool));

        Ok(join_all(executions).await)
    }

    async fn execute_one(&self, call: &ToolCall, tool: Arc<dyn Tool>) -> ToolCallResult {
        let start = Instant::now();

        let args = match call.parsed_arguments() {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "unparsable tool arguments");
                return ToolCallResult::failure(call, format!("invalid arguments: {}", e), 0);
            }
        };

        let outcome = tokio::time::timeout(self.tool_timeout, tool.execute(args)).await;
        let elapsed = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(output)) => {
                debug!(tool = %call.name, elapsed_ms = elapsed, "tool succeeded");
                ToolCallResult::success(call, output, elapsed)
            }
            Ok(Err(e)) => {
                let message = format!("{:#}", e);
                warn!(tool = %call.name, error = %message, "tool failed");
                ToolCallResult::failure(call, message, elapsed)
            }
            Err(_) => {
                warn!(tool = %call.name, timeout = ?self.tool_timeout, "tool timed out");
                ToolCallResult::failure(call, "timeout", elapsed)
            }
        }
    }
}

/// Optional system message followed by the user message
pub fn initial_messages(user_message: &str, system_preamble: Option<&str>) -> Vec<Message> {
    system_preamble
        .map(Message::system)
        .into_iter()
        .chain(std::iter::once(Message::user(user_message)))
        .collect()
}

/// Extend a conversation with the assistant turn that requested tools,
/// followed by one tool-result message per result, in order
pub fn append_tool_round(
    messages: Vec<Message>,
    assistant_turn: Message,
    results: &[ToolCallResult],
) -> Vec<Message> {
    messages
        .into_iter()
        .chain(std::iter::once(assistant_turn))
        .chain(
            results
                .iter()
                .map(|r| Message::tool_result(r.tool_call_id.as_str(), &r.payload())),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::domain::Role;
    use serde_json::json;

    #[test]
    fn initial_messages_put_system_first() {
        let messages = initial_messages("hi", Some("be nice"));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content.as_deref(), Some("hi"));
    }

    #[test]
    fn initial_messages_without_preamble() {
        let messages = initial_messages("hi", None);
        assert_eq!(messages, vec![Message::user("hi")]);
    }

    #[test]
    fn append_tool_round_puts_the_request_before_its_results() {
        let first = ToolCall::new("c1", "a", "{}");
        let second = ToolCall::new("c2", "b", "{}");
        let results = vec![
            ToolCallResult::success(&first, json!([1, 2]), 1),
            ToolCallResult::failure(&second, "boom", 1),
        ];
        let turn = Message::assistant_tool_calls(None, vec![first.clone(), second.clone()]);

        let before = initial_messages("q", None);
        let after = append_tool_round(before.clone(), turn, &results);

        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(after[1].role, Role::Assistant);
        assert!(after[1].requested("c1") && after[1].requested("c2"));
        assert_eq!(after[2].call_id.as_deref(), Some("c1"));
        assert_eq!(after[2].tool_payload(), Some(json!([1, 2])));
        assert_eq!(after[3].call_id.as_deref(), Some("c2"));
        assert_eq!(after[3].tool_payload(), Some(json!({ "error": "boom" })));
    }
}
