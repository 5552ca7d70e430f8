//! Chat agent for the portfolio site
//!
//! Answers visitor questions with an LLM that can call tools backed by the
//! GitHub API.
//!
//! ## Architecture
//!
//! - `domain/` - Core types (Message, ToolCall, ToolDefinition)
//! - `llm/` - LLM provider trait and the OpenAI Responses implementation
//! - `tools/` - Tool trait, registry and GitHub tools
//! - `core/` - The orchestration loop

pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod llm;
pub mod tools;

// Re-export commonly used types
pub use config::*;
pub use domain::*;
pub use error::*;
