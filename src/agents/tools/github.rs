//! GitHub profile and repository tools

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Tool, ToolRegistry};
use crate::agents::config::GithubConfig;
use crate::agents::domain::ToolDefinition;
use crate::agents::error::{AgentError, AgentResult};

const USER_AGENT: &str = concat!("portfolio-chat/", env!("CARGO_PKG_VERSION"));

/// Thin client for the GitHub REST API.
///
/// Responses are passed through untouched; the model reads them as JSON.
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    token: Option<String>,
    repos_per_page: u32,
}

impl GithubClient {
    /// Build a client from configuration, reading the token from the
    /// environment variable named by `config.token_env`.
    pub fn from_config(config: &GithubConfig) -> AgentResult<Self> {
        let username = config.resolve_username().ok_or_else(|| {
            AgentError::Configuration(
                "github.username is not set and GITHUB_USERNAME is empty".to_string(),
            )
        })?;
        let token = std::env::var(&config.token_env).ok().filter(|t| !t.is_empty());
        if token.is_none() {
            tracing::warn!(
                env = %config.token_env,
                "no GitHub token configured, using unauthenticated requests"
            );
        }

        Ok(Self::new(&config.base_url, username, token, config.repos_per_page))
    }

    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        token: Option<String>,
        repos_per_page: u32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            token,
            repos_per_page,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Public profile of the configured account
    pub async fn get_profile(&self) -> anyhow::Result<Value> {
        let url = format!("{}/users/{}", self.base_url, self.username);
        self.get_json(&url, &[]).await
    }

    /// Repositories of the configured account, most recently updated first
    pub async fn get_repos(&self) -> anyhow::Result<Value> {
        let url = format!("{}/users/{}/repos", self.base_url, self.username);
        let per_page = self.repos_per_page.to_string();
        self.get_json(&url, &[("per_page", per_page.as_str()), ("sort", "updated")])
            .await
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> anyhow::Result<Value> {
        let mut request = self
            .client
            .get(url)
            .query(query)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("GitHub request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub API returned {}: {}", status.as_u16(), body);
        }

        response
            .json::<Value>()
            .await
            .context("GitHub API returned invalid JSON")
    }
}

/// The GitHub-backed tools, one variant per tool
#[derive(Clone)]
pub enum GithubTool {
    /// `get_github_profile`
    Profile(Arc<GithubClient>),
    /// `get_github_repos`
    Repos(Arc<GithubClient>),
}

impl GithubTool {
    pub const PROFILE: &'static str = "get_github_profile";
    pub const REPOS: &'static str = "get_github_repos";

    /// Register every GitHub tool backed by `client`
    pub fn register_all(registry: &mut ToolRegistry, client: Arc<GithubClient>) -> AgentResult<()> {
        registry.register(Arc::new(GithubTool::Profile(client.clone())))?;
        registry.register(Arc::new(GithubTool::Repos(client)))?;
        Ok(())
    }
}

#[async_trait]
impl Tool for GithubTool {
    fn definition(&self) -> ToolDefinition {
        let no_params = json!({ "type": "object", "properties": {} });
        match self {
            GithubTool::Profile(_) => ToolDefinition::new(
                Self::PROFILE,
                "Get the site owner's public GitHub profile \
                 (bio, location, followers, public repo count).",
                no_params,
            ),
            GithubTool::Repos(_) => ToolDefinition::new(
                Self::REPOS,
                "List the site owner's public GitHub repositories \
                 with descriptions, languages, stars and update dates.",
                no_params,
            ),
        }
    }

    async fn execute(&self, _args: Value) -> anyhow::Result<Value> {
        match self {
            GithubTool::Profile(client) => client.get_profile().await,
            GithubTool::Repos(client) => client.get_repos().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Arc<GithubClient> {
        Arc::new(GithubClient::new("https://api.github.com/", "octocat", None, 50))
    }

    #[test]
    fn register_all_adds_both_tools() {
        let mut registry = ToolRegistry::new();
        GithubTool::register_all(&mut registry, client()).unwrap();

        let names: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["get_github_profile", "get_github_repos"]);
    }

    #[test]
    fn definitions_use_object_schemas() {
        let def = GithubTool::Repos(client()).definition();
        assert_eq!(def.parameters["type"], "object");
        assert!(!def.description.is_empty());
    }

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(client().base_url, "https://api.github.com");
        assert_eq!(client().username(), "octocat");
    }
}
