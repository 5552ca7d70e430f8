//! Configuration types for the chat agent

use serde::{Deserialize, Serialize};

/// LLM provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmProviderConfig {
    /// Model name/identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Custom base URL (for self-hosted or proxied endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Settings for the chat endpoint and its orchestration loop
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// Sampling temperature in [0, 2]
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Cap on model/tool round trips before the final fallback call
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Optional cap on generated tokens per model call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Path of the system prompt template (Tera syntax)
    #[serde(default = "default_system_prompt_path")]
    pub system_prompt_path: String,
    /// Timeout for a single model call, in seconds
    #[serde(default = "default_llm_timeout")]
    pub llm_timeout_seconds: u64,
    /// Timeout for a single tool execution, in seconds
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_seconds: u64,
    /// Names of the tools offered to the model; all registered tools when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_iterations: default_max_iterations(),
            max_output_tokens: None,
            system_prompt_path: default_system_prompt_path(),
            llm_timeout_seconds: default_llm_timeout(),
            tool_timeout_seconds: default_tool_timeout(),
            tools: None,
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_iterations() -> u32 {
    5
}

fn default_system_prompt_path() -> String {
    "prompts/github.md".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_tool_timeout() -> u64 {
    15
}

/// GitHub data provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubConfig {
    /// REST API base URL
    #[serde(default = "default_github_base_url")]
    pub base_url: String,
    /// Account whose profile and repositories are exposed.
    /// Falls back to the `GITHUB_USERNAME` environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Environment variable containing the bearer token
    #[serde(default = "default_github_token_env")]
    pub token_env: String,
    /// Page size for the repository listing
    #[serde(default = "default_repos_per_page")]
    pub repos_per_page: u32,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            base_url: default_github_base_url(),
            username: None,
            token_env: default_github_token_env(),
            repos_per_page: default_repos_per_page(),
        }
    }
}

impl GithubConfig {
    /// Configured username, or the `GITHUB_USERNAME` environment variable
    pub fn resolve_username(&self) -> Option<String> {
        self.username
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(|| std::env::var("GITHUB_USERNAME").ok().filter(|u| !u.is_empty()))
    }
}

fn default_github_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_repos_per_page() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_config_defaults() {
        let config: ChatConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_iterations, 5);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.system_prompt_path, "prompts/github.md");
        assert!(config.max_output_tokens.is_none());
        assert!(config.tools.is_none());
    }

    #[test]
    fn exposed_tools_are_read_by_name() {
        let config: ChatConfig =
            serde_json::from_str(r#"{ "tools": ["get_github_repos"] }"#).unwrap();
        assert_eq!(config.tools, Some(vec!["get_github_repos".to_string()]));
    }

    #[test]
    fn configured_username_wins() {
        let config = GithubConfig {
            username: Some("octocat".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_username().as_deref(), Some("octocat"));
    }
}
