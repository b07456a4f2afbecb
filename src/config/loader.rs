//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Project config (`<root>/overload.toml`, or an explicit `--config` file)
//! 3. Environment variables (`OVERLOAD_` prefix, `__` separates nesting levels)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::constants::paths;
use crate::types::{OverloadError, Result};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "OVERLOAD_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → project file → env vars
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Config> {
        let config: Config = Self::figment(root, explicit)?
            .extract()
            .map_err(|e| OverloadError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Build the merged figment without extracting it
    pub fn figment(root: &Path, explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(OverloadError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                debug!("Loading config from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let project_path = Self::project_config_path(root);
                if project_path.exists() {
                    debug!("Loading project config from: {}", project_path.display());
                    figment = figment.merge(Toml::file(&project_path));
                }
            }
        }

        // e.g. OVERLOAD_LLM__PRIMARY__MODEL -> llm.primary.model
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment)
    }

    /// Load `.env.local` then `.env` from the project root.
    ///
    /// Variables already set in the process environment win.
    pub fn load_env_files(root: &Path) {
        for name in paths::ENV_FILES {
            let path = root.join(name);
            match dotenvy::from_path(&path) {
                Ok(()) => debug!("Loaded environment from {}", path.display()),
                Err(e) if e.not_found() => {}
                Err(e) => tracing::warn!("Ignoring {}: {}", path.display(), e),
            }
        }
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(paths::CONFIG_FILE)
    }

    /// Show config and layout paths
    pub fn show_path(root: &Path, config: &Config) {
        let mark = |p: &Path| if p.exists() { "✓" } else { "✗" };

        println!("Configuration paths:");
        println!();

        let project = Self::project_config_path(root);
        println!("  Config:  {} {}", mark(&project), project.display());

        for (label, rel) in [
            ("Docs:   ", &config.paths.docs_dir),
            ("Public: ", &config.paths.public_dir),
            ("Lock:   ", &config.paths.lock_file),
            ("Prompt: ", &config.paths.prompt_file),
        ] {
            let path = root.join(rel);
            println!("  {} {} {}", label, mark(&path), path.display());
        }
    }

    /// Render the effective configuration
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| OverloadError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write the default project configuration.
    ///
    /// Returns `false` when a config already exists and `force` is not set.
    pub fn init_project(root: &Path, force: bool) -> Result<bool> {
        let config_path = Self::project_config_path(root);
        if config_path.exists() && !force {
            info!("Project config exists: {}", config_path.display());
            return Ok(false);
        }

        fs::write(&config_path, Self::default_project_config())
            .map_err(|e| OverloadError::write(&config_path, e))?;
        info!("Created project config: {}", config_path.display());
        Ok(true)
    }

    /// Default project config content (TOML)
    fn default_project_config() -> String {
        r#"# overload project configuration
# Every key is optional; environment variables such as
# OVERLOAD_LLM__PRIMARY__MODEL override this file.

[paths]
docs_dir = "docs"
public_dir = "public/docs"
lock_file = "io-lock.json"
prompt_file = "prompts/transform.md"

[transform]
echo = true
# Pause between processed files, in milliseconds
delay_ms = 0
# Copy pages without any <...> markup verbatim (skips the model call)
passthrough_plain = false

[compile]
markdown_only = true

[llm]
fallback_enabled = true

[llm.primary]
provider = "groq"
model = "llama-3.2-90b-text-preview"
timeout_secs = 300
temperature = 0.0

[llm.fallback]
provider = "openai"
model = "gpt-4o-mini"
timeout_secs = 300
temperature = 0.0
"#
        .to_string()
    }
}
