//! CLI Common Utilities
//!
//! Shared initialization and context management for CLI commands.

use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigLoader};
use crate::pipeline::{LockFile, ProjectLayout};
use crate::types::{OverloadError, Result};

/// Global flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Project root (defaults to the current directory)
    pub root: Option<PathBuf>,
    /// Explicit config file instead of `<root>/overload.toml`
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

/// Command execution context
///
/// Resolves the project root, loads `.env` files and configuration, and
/// resolves the configured paths.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub root: PathBuf,
    pub config: Config,
    pub layout: ProjectLayout,
    pub quiet: bool,
}

impl CommandContext {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let root = resolve_root(args.root.as_deref())?;
        ConfigLoader::load_env_files(&root);
        let config = ConfigLoader::load(&root, args.config.as_deref())?;
        let layout = ProjectLayout::new(&root, &config);

        Ok(Self {
            root,
            config,
            layout,
            quiet: args.quiet,
        })
    }

    pub async fn load_lock(&self) -> Result<LockFile> {
        LockFile::load(self.layout.lock_file()).await
    }

    /// Root-relative display path
    pub fn display<'p>(&self, path: &'p Path) -> std::path::Display<'p> {
        path.strip_prefix(&self.root).unwrap_or(path).display()
    }
}

/// Absolute project root; must be an existing directory
pub fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir()?,
    };

    if !root.is_dir() {
        return Err(OverloadError::Config(format!(
            "Project root is not a directory: {}",
            root.display()
        )));
    }

    Ok(std::path::absolute(&root)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_root_rejects_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(resolve_root(Some(&dir.path().join("missing"))).is_err());
        assert!(resolve_root(Some(dir.path())).unwrap().is_absolute());
    }

    #[test]
    fn test_context_display_is_root_relative() {
        let dir = TempDir::new().unwrap();
        let args = GlobalArgs {
            root: Some(dir.path().to_path_buf()),
            config: Some(dir.path().join("absent.toml")),
            quiet: false,
        };
        // Explicit config must exist
        assert!(CommandContext::load(&args).is_err());

        std::fs::write(dir.path().join("custom.toml"), "[transform]\necho = false\n").unwrap();
        let args = GlobalArgs {
            config: Some(dir.path().join("custom.toml")),
            ..args
        };
        let ctx = CommandContext::load(&args).unwrap();
        assert!(!ctx.config.transform.echo);

        let page = ctx.root.join("docs").join("a.md");
        assert_eq!(ctx.display(&page).to_string(), Path::new("docs").join("a.md").display().to_string());
    }
}
