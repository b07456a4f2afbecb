//! AI Integration Layer
//!
//! Streamed text generation against OpenAI-compatible providers with a
//! single size-limit fallback.

pub mod prompt;
pub mod provider;
pub mod stream;

pub use prompt::{DEFAULT_TRANSFORM_PROMPT, PromptTemplate};
pub use provider::{
    ErrorCategory, ErrorClassifier, FallbackChain, Generation, LlmError, LlmProvider,
    OpenAiProvider, SharedProvider, TextRequest, TextStream, create_provider,
};
pub use stream::{NullSink, ProgressSink, StdoutSink, collect_text, decode_sse};
