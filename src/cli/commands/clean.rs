//! Clean Command
//!
//! Deletes non-Markdown files from every library's `input` tree.

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::pipeline::{self, CleanReport};
use crate::types::Result;

pub async fn run(ctx: &CommandContext) -> Result<CleanReport> {
    let report = pipeline::clean(&ctx.layout).await?;

    let out = Output::quiet(ctx.quiet);
    if report.removed.is_empty() {
        out.success(&format!(
            "Clean: nothing to remove ({} libraries)",
            report.libraries
        ));
    } else {
        out.success(&format!(
            "Clean: removed {} files from {} libraries",
            report.removed.len(),
            report.libraries
        ));
        for path in &report.removed {
            out.field("removed", ctx.display(path));
        }
    }

    Ok(report)
}
