//! # portfolio-chat
//!
//! Backend for the chat widget on a personal portfolio site. Visitors ask
//! about the owner's GitHub profile and projects; an LLM answers, calling
//! GitHub-backed tools when it needs data.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use portfolio_chat::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let settings = Settings::new()?;
//!
//!     // Server will start on configured host:port
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Agents**: conversation loop, LLM provider, tool registry
//! - **Adapters**: HTTP handlers (chat, health)
//! - **Config**: configuration management

pub mod adapters;
pub mod agents;
pub mod cli;
pub mod config;

use crate::adapters::chat_handler::{self, ChatState};
use crate::adapters::health_handler::HealthHandler;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `chat_state` - Orchestrator, tool registry, system prompt and model options
/// * `health_handler` - Health check handler
///
/// # Returns
///
/// Configured Axum Router
pub fn create_app(chat_state: ChatState, health_handler: Arc<HealthHandler>) -> Router {
    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }));

    let api_router = Router::new()
        .route("/chat", post(chat_handler::chat))
        .with_state(chat_state);

    health_router
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}
