//! Ports - Interfaces for external integrations.
//!
//! Following hexagonal architecture, these traits define what the core
//! needs from the outside world without specifying implementations.
//! Adapters in `crate::adapters` provide the concrete backends.

mod ai_provider;
mod prompt_store;

pub use ai_provider::{
    AIError, AIProvider, ChatMessage, CompletionRequest, CompletionResponse, MessageRole,
    ProviderInfo, TokenUsage,
};
pub use prompt_store::{substitute, PromptCategory, PromptError, PromptStore};
