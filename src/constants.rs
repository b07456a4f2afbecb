//! Global Constants
//!
//! Centralized constants for layout, providers and tuning.

/// Documentation tree layout
pub mod layout {
    /// Per-library source subdirectory
    pub const INPUT_DIR: &str = "input";

    /// Per-library transformed subdirectory
    pub const OUTPUT_DIR: &str = "output";

    /// Extensions treated as Markdown documents
    pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx"];

    /// Extension forced onto every transformed and compiled file
    pub const OUTPUT_EXTENSION: &str = "md";

    /// Separator placed between documents in a compiled file
    pub const DOCUMENT_SEPARATOR: &str = "\n\n";
}

/// Default project paths (relative to the project root)
pub mod paths {
    pub const DOCS_DIR: &str = "docs";
    pub const PUBLIC_DIR: &str = "public/docs";
    pub const LOCK_FILE: &str = "io-lock.json";
    pub const PROMPT_FILE: &str = "prompts/transform.md";
    pub const CONFIG_FILE: &str = "overload.toml";

    /// Dotenv files loaded before configuration, first match wins per variable
    pub const ENV_FILES: &[&str] = &[".env.local", ".env"];
}

/// Provider defaults
pub mod provider {
    pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
    pub const GROQ_MODEL: &str = "llama-3.2-90b-text-preview";
    pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

    pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
    pub const OPENAI_MODEL: &str = "gpt-4o-mini";
    pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
}

/// Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}
