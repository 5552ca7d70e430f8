use clap::Parser;
use portfolio_chat::adapters::chat_handler::ChatState;
use portfolio_chat::adapters::health_handler::HealthHandler;
use portfolio_chat::agents::core::{render_system_prompt, ChatOrchestrator};
use portfolio_chat::agents::llm::{create_provider, ChatOptions};
use portfolio_chat::agents::tools::{GithubClient, GithubTool, ToolRegistry};
use portfolio_chat::cli::Cli;
use portfolio_chat::config::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("portfolio_chat=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting portfolio chat server on {}:{}", host, port);

    // LLM provider
    let llm = create_provider(
        &settings.llm,
        Duration::from_secs(settings.chat.llm_timeout_seconds),
    )?;
    info!(provider = llm.name(), model = %settings.llm.model, "LLM provider ready");

    // Tools
    let github = Arc::new(GithubClient::from_config(&settings.github)?);
    let github_username = github.username().to_string();
    let mut registry = ToolRegistry::new();
    GithubTool::register_all(&mut registry, github)?;
    let exposed = match &settings.chat.tools {
        Some(names) => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            registry.select(&names)?
        }
        None => registry.definitions(),
    };
    registry.ensure_covers(&exposed)?;
    info!(tools = registry.len(), exposed = exposed.len(), "Tool registry initialized");

    // System prompt
    let system_prompt = match settings.load_system_prompt() {
        Ok(template) => Some(render_system_prompt(
            &template,
            &serde_json::json!({ "github_username": github_username }),
        )),
        Err(e) => {
            warn!("{}; answering without a system prompt", e);
            None
        }
    };

    let orchestrator = ChatOrchestrator::new(llm)
        .with_max_iterations(settings.chat.max_iterations)
        .with_tool_timeout(Duration::from_secs(settings.chat.tool_timeout_seconds));

    let options = ChatOptions::new(settings.llm.model.clone(), settings.chat.temperature)
        .with_max_output_tokens(settings.chat.max_output_tokens);

    let health_handler = Arc::new(HealthHandler::new(registry.len(), system_prompt.is_some()));
    let mut chat_state = ChatState::new(
        Arc::new(orchestrator),
        Arc::new(registry),
        system_prompt,
        options,
    );
    if let Some(names) = settings.chat.tools.clone() {
        chat_state = chat_state.with_exposed_tools(names);
    }

    // Create application using the library function
    let app = portfolio_chat::create_app(chat_state, health_handler);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
