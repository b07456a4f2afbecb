//! Run Command
//!
//! clean → transform → compile, stopping at the first failure.

use tracing::info;

use super::{clean, compile, transform};
use crate::cli::util::CommandContext;
use crate::types::Result;

pub async fn run(ctx: &CommandContext, no_echo: bool) -> Result<()> {
    info!("Step 1/3: clean");
    clean::run(ctx).await?;

    info!("Step 2/3: transform");
    transform::run(ctx, no_echo).await?;

    info!("Step 3/3: compile");
    compile::run(ctx).await?;

    Ok(())
}
