//! Tool call types for agent interactions

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A tool invocation emitted by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call id used to correlate the eventual result
    pub id: String,
    /// Name of the tool being called
    pub name: String,
    /// Raw serialized arguments, not yet parsed
    pub arguments: String,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse the raw arguments. An empty argument string means "no arguments".
    pub fn parsed_arguments(&self) -> Result<Value, serde_json::Error> {
        if self.arguments.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&self.arguments)
    }
}

/// Result of executing a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// ID of the tool call this is responding to
    pub tool_call_id: String,
    /// Name of the tool that was called
    pub tool_name: String,
    /// Output returned by the tool
    pub output: Value,
    /// Execution time in milliseconds
    pub execution_time_ms: u64,
    /// Whether the tool execution succeeded
    pub success: bool,
    /// Error message if execution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCallResult {
    /// Create a successful tool call result
    pub fn success(call: &ToolCall, output: Value, execution_time_ms: u64) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            output,
            execution_time_ms,
            success: true,
            error: None,
        }
    }

    /// Create a failed tool call result
    pub fn failure(call: &ToolCall, error: impl Into<String>, execution_time_ms: u64) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            output: Value::Null,
            execution_time_ms,
            success: false,
            error: Some(error.into()),
        }
    }

    /// The value handed back to the model: the tool output, or `{"error": ...}`
    pub fn payload(&self) -> Value {
        match &self.error {
            Some(error) => json!({ "error": error }),
            None => self.output.clone(),
        }
    }
}

/// Definition of a tool exposed to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema defining the tool's parameters
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Parameters as a JSON Schema object the backend will accept.
    ///
    /// A null or empty schema becomes an object with no properties, and a
    /// schema without `type` gets `"type": "object"`.
    pub fn parameters_schema(&self) -> Value {
        let is_empty = self
            .parameters
            .as_object()
            .map_or(true, |o| o.is_empty());
        if is_empty {
            return json!({ "type": "object", "properties": {} });
        }

        let mut params = self.parameters.clone();
        if params.get("type").is_none() {
            if let Some(obj) = params.as_object_mut() {
                obj.insert("type".to_string(), json!("object"));
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_arguments_parse_as_empty_object() {
        let call = ToolCall::new("call_1", "get_github_profile", "");
        assert_eq!(call.parsed_arguments().unwrap(), json!({}));
    }

    #[test]
    fn malformed_arguments_are_an_error() {
        let call = ToolCall::new("call_1", "get_github_repos", "{not json");
        assert!(call.parsed_arguments().is_err());
    }

    #[test]
    fn failure_payload_has_error_field() {
        let call = ToolCall::new("call_9", "get_github_repos", "{}");
        let result = ToolCallResult::failure(&call, "rate limited", 3);
        assert!(!result.success);
        assert_eq!(result.payload(), json!({ "error": "rate limited" }));
    }

    #[test]
    fn success_payload_is_raw_output() {
        let call = ToolCall::new("call_9", "get_github_profile", "{}");
        let result = ToolCallResult::success(&call, json!({ "login": "octocat" }), 10);
        assert_eq!(result.payload(), json!({ "login": "octocat" }));
        assert_eq!(result.tool_call_id, "call_9");
    }

    #[test]
    fn parameters_schema_normalizes_empty_schema() {
        let def = ToolDefinition::new("t", "d", Value::Null);
        assert_eq!(def.parameters_schema(), json!({ "type": "object", "properties": {} }));

        let schema = json!({ "properties": { "q": { "type": "string" } } });
        let def = ToolDefinition::new("t", "d", schema);
        assert_eq!(def.parameters_schema()["type"], "object");
        assert_eq!(def.parameters_schema()["properties"]["q"]["type"], "string");
    }
}
