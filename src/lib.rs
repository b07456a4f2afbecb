//! overload - Incremental LLM Documentation Pipeline
//!
//! Turns per-library documentation pages into compact Markdown files meant to
//! be pasted into an LLM context window.
//!
//! ## Pipeline
//!
//! - **Clean**: drop everything but `.md`/`.mdx` from `docs/<library>/input`
//! - **Transform**: send changed pages through a model, writing
//!   `docs/<library>/output`; an MD5 lock file (`io-lock.json`) skips unchanged pages
//! - **Compile**: concatenate each library into `public/docs/<library>.md`
//!
//! ## Quick Start
//!
//! ```ignore
//! use overload::{Config, FallbackChain, LockFile, NullSink, ProjectLayout, Transformer};
//!
//! let config = Config::default();
//! let layout = ProjectLayout::new(&root, &config);
//! let chain = FallbackChain::from_config(&config.llm)?;
//! let mut lock = LockFile::load(layout.lock_file()).await?;
//! let report = Transformer::new(&layout, &chain, (&config.transform).into())
//!     .run(&mut lock, &mut NullSink)
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: provider abstraction, SSE streaming, size-limit fallback
//! - [`pipeline`]: layout, lock file, cleaner, transformer, compiler
//! - [`config`]: figment-based configuration
//! - [`cli`]: command handlers

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod pipeline;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{ErrorCategory, LlmError, OverloadError, Result};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{
    Compiler, ContentChecksum, LockFile, ProjectLayout, Transformer, clean, input_to_output,
};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{FallbackChain, LlmProvider, NullSink, ProgressSink, StdoutSink, TextRequest};
