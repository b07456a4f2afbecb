//! Init Command
//!
//! Scaffold a project: `overload.toml`, the docs and public directories, an
//! empty lock file and the starter prompt template.

use crate::ai::prompt;
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, GlobalArgs, resolve_root};
use crate::config::ConfigLoader;
use crate::pipeline::LockFile;
use crate::types::{OverloadError, Result};

pub async fn run(args: &GlobalArgs, force: bool) -> Result<()> {
    let root = resolve_root(args.root.as_deref())?;
    let config_path = ConfigLoader::project_config_path(&root);

    if config_path.exists() && !force {
        return Err(OverloadError::Config(
            "Already initialized. Use --force to overwrite.".to_string(),
        ));
    }

    ConfigLoader::init_project(&root, true)?;

    let ctx = CommandContext::load(&GlobalArgs {
        root: Some(root.clone()),
        ..args.clone()
    })?;
    let layout = &ctx.layout;

    for dir in [layout.docs_dir(), layout.public_dir()] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| OverloadError::write(dir, e))?;
    }

    // An existing lock is kept even with --force; deleting it would
    // re-transform every page
    let lock_created = if layout.lock_file().exists() {
        false
    } else {
        LockFile::empty(layout.lock_file()).save().await?;
        true
    };

    let prompt_created = prompt::write_default(layout.prompt_file(), force).await?;

    let out = Output::quiet(args.quiet);
    out.success(&format!("Initialized overload in {}", root.display()));
    out.field("Config", ctx.display(&config_path));
    out.field("Docs", ctx.display(layout.docs_dir()));
    out.field("Public", ctx.display(layout.public_dir()));
    out.field(
        "Lock",
        format!(
            "{}{}",
            ctx.display(layout.lock_file()),
            if lock_created { "" } else { " (kept)" }
        ),
    );
    out.field(
        "Prompt",
        format!(
            "{}{}",
            ctx.display(layout.prompt_file()),
            if prompt_created { "" } else { " (kept)" }
        ),
    );
    out.info("Next: add pages under docs/<library>/input/ and run `overload run`");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(dir: &TempDir) -> GlobalArgs {
        GlobalArgs {
            root: Some(dir.path().to_path_buf()),
            config: None,
            quiet: true,
        }
    }

    #[tokio::test]
    async fn test_init_scaffolds_project() {
        let dir = TempDir::new().unwrap();
        run(&args(&dir), false).await.unwrap();

        let root = dir.path();
        assert!(root.join("overload.toml").is_file());
        assert!(root.join("docs").is_dir());
        assert!(root.join("public/docs").is_dir());
        assert_eq!(std::fs::read_to_string(root.join("io-lock.json")).unwrap(), "{}");
        assert_eq!(
            std::fs::read_to_string(root.join("prompts/transform.md")).unwrap(),
            prompt::DEFAULT_TRANSFORM_PROMPT
        );
    }

    #[tokio::test]
    async fn test_init_refuses_without_force_and_keeps_lock() {
        let dir = TempDir::new().unwrap();
        run(&args(&dir), false).await.unwrap();
        assert!(run(&args(&dir), false).await.is_err());

        let lock = dir.path().join("io-lock.json");
        std::fs::write(&lock, r#"{"docs/a/input/x.md": "abc"}"#).unwrap();
        run(&args(&dir), true).await.unwrap();
        assert!(std::fs::read_to_string(&lock).unwrap().contains("x.md"));
    }
}
