//! Tool registry
//!
//! A fixed mapping from tool name to its definition and executor. The
//! registry is assembled once at startup, checked against the definitions it
//! will expose, and shared read-only afterwards.

mod github;

pub use github::{GithubClient, GithubTool};

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::agents::domain::ToolDefinition;
use crate::agents::error::{AgentError, AgentResult};

/// A capability the model can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Definition exposed to the model. Its `name` is the registry key.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with parsed arguments
    async fn execute(&self, args: Value) -> anyhow::Result<Value>;
}

/// Registry of executable tools keyed by name
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Duplicate names are a configuration error.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> AgentResult<()> {
        let name = tool.definition().name;
        if self.tools.contains_key(&name) {
            return Err(AgentError::Configuration(format!("duplicate tool name: {}", name)));
        }
        tracing::debug!(tool = %name, "tool registered");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Definitions of every registered tool, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Definitions for a subset of tools; unknown names are an error
    pub fn select(&self, names: &[&str]) -> AgentResult<Vec<ToolDefinition>> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .map(|t| t.definition())
                    .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))
            })
            .collect()
    }

    /// Fail if any exposed definition lacks a registered executor
    pub fn ensure_covers(&self, definitions: &[ToolDefinition]) -> AgentResult<()> {
        let missing: Vec<&str> = definitions
            .iter()
            .filter(|d| !self.tools.contains_key(&d.name))
            .map(|d| d.name.as_str())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AgentError::Configuration(format!(
                "tools declared without an executor: {}",
                missing.join(", ")
            )))
        }
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
