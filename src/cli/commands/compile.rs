//! Compile Command
//!
//! Writes one concatenated Markdown file per library.

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::pipeline::{CompileReport, CompileSource, Compiler};
use crate::types::Result;

pub async fn run(ctx: &CommandContext) -> Result<CompileReport> {
    let report = Compiler::new(&ctx.layout, ctx.config.compile.markdown_only)
        .run()
        .await?;

    let out = Output::quiet(ctx.quiet);
    out.success(&format!("Compile: {} libraries", report.libraries.len()));
    for lib in &report.libraries {
        let line = format!(
            "{} pages from {}, {} bytes",
            lib.files, lib.source, lib.bytes
        );
        if lib.source == CompileSource::Empty {
            out.warning(&format!("{}: no pages", lib.name));
        }
        out.field(&ctx.display(&lib.destination).to_string(), line);
    }

    Ok(report)
}
