//! Conversation orchestration
//!
//! - `ChatOrchestrator`: the request → tool execution → feed-back loop
//! - `render_system_prompt`: Tera rendering of the configured preamble

mod orchestrator;

pub use orchestrator::{append_tool_round, initial_messages, ChatOrchestrator};

use serde_json::Value;
use tera::{Context, Tera};

/// Render the system prompt as a Tera template with the given values
///
/// This allows the prompt file to use template variables like:
/// ```text
/// You answer questions about {{ github_username }}'s work.
/// ```
///
/// Falls back to the original text if rendering fails.
pub fn render_system_prompt(system_prompt: &str, vars: &Value) -> String {
    if !system_prompt.contains("{{") && !system_prompt.contains("{%") {
        return system_prompt.to_string();
    }

    let mut context = Context::new();

    if let Some(obj) = vars.as_object() {
        for (key, value) in obj {
            match value {
                Value::String(s) => {
                    context.insert(key, s);
                }
                Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        context.insert(key, &i);
                    } else if let Some(f) = n.as_f64() {
                        context.insert(key, &f);
                    }
                }
                Value::Bool(b) => {
                    context.insert(key, b);
                }
                Value::Array(_) | Value::Object(_) => {
                    context.insert(key, &value.to_string());
                }
                Value::Null => {
                    context.insert(key, &"");
                }
            }
        }
    }

    match Tera::one_off(system_prompt, &context, false) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::warn!("Failed to render system prompt template: {}", e);
            system_prompt.to_string()
        }
    }
}
