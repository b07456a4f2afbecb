//! Config Command
//!
//! Usage:
//!   overload config show [-f json]
//!   overload config path
//!   overload config init [--force]

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, GlobalArgs, resolve_root};
use crate::config::ConfigLoader;
use crate::types::Result;

/// Print the effective configuration (defaults, file and environment merged)
pub fn show(ctx: &CommandContext, format: &str) -> Result<()> {
    println!("{}", ConfigLoader::render(&ctx.config, format == "json")?);
    Ok(())
}

/// Show configuration and layout paths
pub fn path(ctx: &CommandContext) -> Result<()> {
    ConfigLoader::show_path(&ctx.root, &ctx.config);
    Ok(())
}

/// Write `overload.toml` with every default spelled out
pub fn init(args: &GlobalArgs, force: bool) -> Result<()> {
    let root = resolve_root(args.root.as_deref())?;
    let out = Output::quiet(args.quiet);
    let path = ConfigLoader::project_config_path(&root);

    if ConfigLoader::init_project(&root, force)? {
        out.success(&format!("Created {}", path.display()));
    } else {
        out.warning(&format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        ));
    }
    Ok(())
}
