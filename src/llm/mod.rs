// src/llm/mod.rs
pub mod provider;

pub use provider::{ChatMessage, LlmProvider, OpenAiCompatProvider, ProviderMetadata, ProviderResponse};
