#![allow(dead_code)]

use async_trait::async_trait;
use portfolio_chat::agents::domain::{Message, ToolDefinition};
use portfolio_chat::agents::error::{LlmError, LlmResult};
use portfolio_chat::agents::llm::{ChatOptions, CompletionResponse, LlmProvider};
use portfolio_chat::agents::tools::Tool;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One recorded provider call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

/// Provider that replays a fixed script of responses and records every call.
///
/// When the script runs out, `fallback` is returned (if set) for every
/// further call; otherwise the call fails.
pub struct ScriptedLlm {
    script: Mutex<VecDeque<LlmResult<CompletionResponse>>>,
    fallback: Option<CompletionResponse>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedLlm {
    pub fn new(script: Vec<LlmResult<CompletionResponse>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(responses: Vec<CompletionResponse>) -> Arc<Self> {
        Self::new(responses.into_iter().map(Ok).collect())
    }

    /// Returns `response` forever
    pub fn always(response: CompletionResponse) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(response),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &ChatOptions,
    ) -> LlmResult<CompletionResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            options: options.clone(),
        });

        let next = self.script.lock().unwrap().pop_front();
        match (next, &self.fallback) {
            (Some(result), _) => result,
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => Err(LlmError::InvalidRequest("script exhausted".to_string())),
        }
    }
}

/// Tool whose behaviour is fixed at construction
pub struct FakeTool {
    name: String,
    delay: Duration,
    outcome: Result<Value, String>,
}

impl FakeTool {
    pub fn ok(name: &str, output: Value) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            delay: Duration::ZERO,
            outcome: Ok(output),
        })
    }

    pub fn failing(name: &str, error: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            delay: Duration::ZERO,
            outcome: Err(error.to_string()),
        })
    }

    pub fn slow(name: &str, delay: Duration, output: Value) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            delay,
            outcome: Ok(output),
        })
    }
}

#[async_trait]
impl Tool for FakeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(&self.name, format!("fake {}", self.name), json!({}))
    }

    async fn execute(&self, _args: Value) -> anyhow::Result<Value> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.outcome {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}

/// Serve `app` on a random local port and return its address
pub async fn spawn_server(app: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}
