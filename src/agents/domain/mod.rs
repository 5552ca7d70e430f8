//! Domain types for the chat agent
//!
//! Conversation messages and the tool-call vocabulary shared by the
//! provider, the orchestrator and the tool registry.

mod message;
mod tool_call;

pub use message::*;
pub use tool_call::*;
