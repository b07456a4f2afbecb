//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for streamed text generation.
//! Groq and OpenAI both speak the Chat Completions protocol, so a single
//! HTTP implementation serves either backend.
//!
//! ## Modules
//!
//! - `fallback`: Primary/secondary dispatch on size-limit rejections
//! - `openai`: Chat Completions streaming client

mod fallback;
#[cfg(test)]
pub(crate) mod mock;
mod openai;

pub use fallback::{FallbackChain, Generation};
pub use openai::OpenAiProvider;

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::types::Result;

/// One transform call: fixed system instructions plus the document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    pub system: String,
    pub prompt: String,
}

impl TextRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
        }
    }
}

/// Text fragments in arrival order
pub type TextStream = BoxStream<'static, Result<String>>;

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// LLM Provider Trait
// =============================================================================

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Start a streamed completion.
    ///
    /// Rejections that happen before the first byte (bad status, missing key)
    /// surface here; failures mid-stream surface as stream items.
    async fn stream(&self, request: &TextRequest) -> Result<TextStream>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    Ok(Arc::new(OpenAiProvider::new(config)?))
}
