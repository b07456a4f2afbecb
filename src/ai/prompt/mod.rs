//! Transform Prompt Template
//!
//! The system instructions sent with every document live in a plain
//! Markdown file so they can be tuned without rebuilding.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ai::provider::TextRequest;
use crate::types::{OverloadError, Result};

/// Starter instructions written by `overload init`
pub const DEFAULT_TRANSFORM_PROMPT: &str = r#"You convert documentation pages into plain, dense Markdown for use as LLM context.

Rules:
- Keep every fact, API signature, parameter, default value and code example.
- Remove navigation, marketing copy, badges and decorative HTML.
- Replace JSX/MDX components with their textual meaning or drop them when purely visual.
- Keep fenced code blocks intact, including the language tag.
- Use ATX headings (#, ##, ###) and keep the original heading hierarchy.
- Do not add commentary, summaries or anything that is not in the page.

Respond with the converted Markdown only.
"#;

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    path: PathBuf,
    system: String,
}

impl PromptTemplate {
    pub async fn load(path: &Path) -> Result<Self> {
        let system = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OverloadError::Config(format!(
                    "Prompt template not found: {} (run `overload init` to create one)",
                    path.display()
                )));
            }
            Err(e) => return Err(OverloadError::read(path, e)),
        };

        if system.trim().is_empty() {
            return Err(OverloadError::Config(format!(
                "Prompt template is empty: {}",
                path.display()
            )));
        }

        debug!("Loaded prompt template from {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            system,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    /// Pair the instructions with one document
    pub fn request_for(&self, document: &str) -> TextRequest {
        TextRequest::new(self.system.as_str(), document)
    }
}

/// Write the starter template unless one exists (or `force` is set).
///
/// Returns whether the file was written.
pub async fn write_default(path: &Path, force: bool) -> Result<bool> {
    if !force && tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| OverloadError::write(parent, e))?;
    }
    tokio::fs::write(path, DEFAULT_TRANSFORM_PROMPT)
        .await
        .map_err(|e| OverloadError::write(path, e))?;
    Ok(true)
}
