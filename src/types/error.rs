//! Unified Error Type System
//!
//! Centralized error types for the whole pipeline.
//! LLM failures carry a category so the fallback dispatch can route on a type
//! instead of on provider wording.
//!
//! ## Error Categories
//!
//! - **TokenLimit**: Request too large for the model (fallback to secondary)
//! - **RateLimit**: API rate limiting
//! - **Auth**: Missing or rejected credentials
//! - **Network**: Connectivity issues
//! - **Unavailable**: Provider unavailable
//!
//! Only `TokenLimit` triggers a fallback. Everything else aborts the run.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Context/request size exceeded - fallback to the secondary provider
    TokenLimit,
    /// Rate limited
    RateLimit,
    /// Authentication failed or API key missing
    Auth,
    /// Network/connectivity issues
    Network,
    /// Provider unavailable
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Temporary server issues
    Transient,
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenLimit => write!(f, "TOKEN_LIMIT"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category should trigger fallback to the secondary provider
    pub fn should_fallback(&self) -> bool {
        matches!(self, Self::TokenLimit)
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// LLM error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category for routing decisions
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    pub fn should_fallback(&self) -> bool {
        self.category.should_fallback()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps provider failure signals onto categories.
///
/// Works on structured signals only: the HTTP status and the machine-readable
/// `code` field of an OpenAI-style error body.
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Error codes that mean the request was too large for the model
    const SIZE_LIMIT_CODES: &'static [&'static str] =
        &["context_length_exceeded", "request_too_large"];

    /// Classify an HTTP failure, optionally refined by the error body's `code`.
    ///
    /// 413 always means the request was too large, whatever `code` says
    /// (Groq reports oversized requests as 413 with `rate_limit_exceeded`).
    pub fn classify_http(status: u16, code: Option<&str>, message: &str, provider: &str) -> LlmError {
        if status == 413 {
            return LlmError::with_provider(ErrorCategory::TokenLimit, message, provider);
        }

        if let Some(category) = code.and_then(Self::classify_code) {
            return LlmError::with_provider(category, message, provider);
        }

        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify an error payload that arrived inside an event stream
    pub fn classify_stream_error(code: Option<&str>, message: &str, provider: &str) -> LlmError {
        let category = code
            .and_then(Self::classify_code)
            .unwrap_or(ErrorCategory::Unknown);
        LlmError::with_provider(category, message, provider)
    }

    fn classify_code(code: &str) -> Option<ErrorCategory> {
        if Self::SIZE_LIMIT_CODES.contains(&code) {
            return Some(ErrorCategory::TokenLimit);
        }
        match code {
            "rate_limit_exceeded" => Some(ErrorCategory::RateLimit),
            "invalid_api_key" => Some(ErrorCategory::Auth),
            "model_not_found" => Some(ErrorCategory::Unavailable),
            _ => None,
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum OverloadError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] ignore::Error),

    // -------------------------------------------------------------------------
    // LLM Errors
    // -------------------------------------------------------------------------
    #[error("LLM error: {0}")]
    Llm(LlmError),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Lock file {path} is corrupt: {message}")]
    LockFile { path: PathBuf, message: String },

    #[error("Path is not valid UTF-8 or lies outside the project root: {0}")]
    InvalidPath(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<LlmError> for OverloadError {
    fn from(err: LlmError) -> Self {
        OverloadError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, OverloadError>;

impl OverloadError {
    /// True when the request was rejected as too large for the model
    pub fn is_size_limit(&self) -> bool {
        matches!(self, Self::Llm(e) if e.should_fallback())
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::TokenLimit.to_string(), "TOKEN_LIMIT");
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_only_token_limit_falls_back() {
        assert!(ErrorCategory::TokenLimit.should_fallback());
        assert!(!ErrorCategory::RateLimit.should_fallback());
        assert!(!ErrorCategory::Unavailable.should_fallback());
        assert!(!ErrorCategory::Unknown.should_fallback());
    }

    #[test]
    fn test_classify_413_as_token_limit() {
        let err = ErrorClassifier::classify_http(413, None, "Request Entity Too Large", "groq");
        assert_eq!(err.category, ErrorCategory::TokenLimit);
        assert_eq!(err.provider.as_deref(), Some("groq"));
    }

    #[test]
    fn test_413_wins_over_rate_limit_code() {
        let err = ErrorClassifier::classify_http(
            413,
            Some("rate_limit_exceeded"),
            "Request too large for model on tokens per minute",
            "groq",
        );
        assert_eq!(err.category, ErrorCategory::TokenLimit);
    }

    #[test]
    fn test_code_overrides_status() {
        let err = ErrorClassifier::classify_http(
            400,
            Some("context_length_exceeded"),
            "maximum context length is 8192 tokens",
            "openai",
        );
        assert_eq!(err.category, ErrorCategory::TokenLimit);

        let err = ErrorClassifier::classify_http(400, Some("something_else"), "nope", "openai");
        assert_eq!(err.category, ErrorCategory::BadRequest);
    }

    #[test]
    fn test_message_wording_is_not_used() {
        // Provider prose alone never decides the category
        let err = ErrorClassifier::classify_http(500, None, "Request too large for model", "groq");
        assert_eq!(err.category, ErrorCategory::Transient);
    }

    #[test]
    fn test_classify_http_status_table() {
        assert_eq!(
            ErrorClassifier::classify_http(429, None, "", "p").category,
            ErrorCategory::RateLimit
        );
        assert_eq!(
            ErrorClassifier::classify_http(401, None, "", "p").category,
            ErrorCategory::Auth
        );
        assert_eq!(
            ErrorClassifier::classify_http(404, None, "", "p").category,
            ErrorCategory::Unavailable
        );
        assert_eq!(
            ErrorClassifier::classify_http(418, None, "", "p").category,
            ErrorCategory::Unknown
        );
    }

    #[test]
    fn test_is_size_limit() {
        let err: OverloadError =
            LlmError::new(ErrorCategory::TokenLimit, "too big").into();
        assert!(err.is_size_limit());

        let err: OverloadError = LlmError::new(ErrorCategory::RateLimit, "slow down").into();
        assert!(!err.is_size_limit());

        let err = OverloadError::Config("bad".to_string());
        assert!(!err.is_size_limit());
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::Auth, "missing key", "openai");
        assert_eq!(err.to_string(), "[openai:AUTH] missing key");

        let err = LlmError::new(ErrorCategory::Unknown, "boom");
        assert_eq!(err.to_string(), "[UNKNOWN] boom");
    }
}
