//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Paths are relative to the project root unless absolute.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{network, paths, provider};
use crate::types::{OverloadError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project layout
    pub paths: PathsConfig,

    /// Transformer settings
    pub transform: TransformConfig,

    /// Compiler settings
    pub compile: CompileConfig,

    /// LLM provider settings
    pub llm: LlmConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `OverloadError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        for (name, provider) in [("primary", &self.llm.primary), ("fallback", &self.llm.fallback)] {
            if !(0.0..=2.0).contains(&provider.temperature) {
                return Err(OverloadError::Config(format!(
                    "llm.{} temperature must be between 0.0 and 2.0, got {}",
                    name, provider.temperature
                )));
            }

            if provider.timeout_secs == 0 {
                return Err(OverloadError::Config(format!(
                    "llm.{} timeout_secs must be greater than 0",
                    name
                )));
            }

            if provider.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
                return Err(OverloadError::Config(format!(
                    "llm.{} model must not be empty",
                    name
                )));
            }
        }

        for (name, path) in [
            ("docs_dir", &self.paths.docs_dir),
            ("public_dir", &self.paths.public_dir),
            ("lock_file", &self.paths.lock_file),
            ("prompt_file", &self.paths.prompt_file),
        ] {
            if path.as_os_str().is_empty() {
                return Err(OverloadError::Config(format!(
                    "paths.{} must not be empty",
                    name
                )));
            }
        }

        let docs = &self.paths.docs_dir;
        if docs.is_absolute()
            || docs
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(OverloadError::Config(format!(
                "paths.docs_dir must be relative to the project root without '..': {}",
                docs.display()
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Paths Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the per-library documentation tree
    pub docs_dir: PathBuf,

    /// Directory receiving compiled `<library>.md` files
    pub public_dir: PathBuf,

    /// Checksum lock file
    pub lock_file: PathBuf,

    /// System instructions for the transform call
    pub prompt_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from(paths::DOCS_DIR),
            public_dir: PathBuf::from(paths::PUBLIC_DIR),
            lock_file: PathBuf::from(paths::LOCK_FILE),
            prompt_file: PathBuf::from(paths::PROMPT_FILE),
        }
    }
}

// =============================================================================
// Transform Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Echo streamed model output to stdout
    pub echo: bool,

    /// Pause after each processed file (milliseconds)
    pub delay_ms: u64,

    /// Copy files without any `<...>` markup verbatim instead of calling the model
    pub passthrough_plain: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            echo: true,
            delay_ms: 0,
            passthrough_plain: false,
        }
    }
}

// =============================================================================
// Compile Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Only concatenate `.md`/`.mdx` files
    pub markdown_only: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            markdown_only: true,
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider tried first for every document
    pub primary: ProviderConfig,

    /// Provider used once when the primary rejects a request as too large
    pub fallback: ProviderConfig,

    /// Disable to fail instead of falling back
    pub fallback_enabled: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            primary: ProviderConfig::for_kind(ProviderKind::Groq),
            fallback: ProviderConfig::for_kind(ProviderKind::OpenAi),
            fallback_enabled: true,
        }
    }
}

/// Supported OpenAI-compatible backends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Groq,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Self::Groq => provider::GROQ_API_BASE,
            Self::OpenAi => provider::OPENAI_API_BASE,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Groq => provider::GROQ_MODEL,
            Self::OpenAi => provider::OPENAI_MODEL,
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::Groq => provider::GROQ_API_KEY_ENV,
            Self::OpenAi => provider::OPENAI_API_KEY_ENV,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Groq => write!(f, "groq"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

/// Configuration for one LLM provider
///
/// API keys are never part of the configuration; `api_key_env` names the
/// environment variable that holds the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub provider: ProviderKind,

    /// Model name (defaults per provider)
    pub model: Option<String>,

    /// API base URL (defaults per provider)
    pub api_base: Option<String>,

    /// Environment variable holding the API key (defaults per provider)
    pub api_key_env: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::for_kind(ProviderKind::default())
    }
}

impl ProviderConfig {
    pub fn for_kind(provider: ProviderKind) -> Self {
        Self {
            provider,
            model: None,
            api_base: None,
            api_key_env: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
            max_tokens: None,
        }
    }

    pub fn resolved_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn resolved_api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_base())
            .trim_end_matches('/')
    }

    pub fn resolved_api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_key_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.paths.lock_file, PathBuf::from("io-lock.json"));
        assert!(config.compile.markdown_only);
        assert!(!config.transform.passthrough_plain);
    }

    #[test]
    fn test_default_providers() {
        let llm = LlmConfig::default();
        assert_eq!(llm.primary.provider, ProviderKind::Groq);
        assert_eq!(llm.primary.resolved_model(), "llama-3.2-90b-text-preview");
        assert_eq!(llm.primary.resolved_api_key_env(), "GROQ_API_KEY");
        assert_eq!(llm.fallback.provider, ProviderKind::OpenAi);
        assert_eq!(llm.fallback.resolved_model(), "gpt-4o-mini");
        assert!(llm.fallback_enabled);
    }

    #[test]
    fn test_resolved_api_base_trims_trailing_slash() {
        let config = ProviderConfig {
            api_base: Some("http://localhost:8080/v1/".to_string()),
            ..ProviderConfig::for_kind(ProviderKind::OpenAi)
        };
        assert_eq!(config.resolved_api_base(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = Config::default();
        config.llm.fallback.temperature = 3.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm.fallback temperature"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.llm.primary.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        let mut config = Config::default();
        config.paths.docs_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_escaping_docs_dir() {
        let mut config = Config::default();
        config.paths.docs_dir = PathBuf::from("../elsewhere");
        assert!(config.validate().is_err());

        config.paths.docs_dir = PathBuf::from("site/docs");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_kind_serde() {
        let kind: ProviderKind = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(kind, ProviderKind::OpenAi);
        assert_eq!(serde_json::to_string(&ProviderKind::Groq).unwrap(), "\"groq\"");
    }
}
