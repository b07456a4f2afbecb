//! Status Command
//!
//! Show per-library page counts and what the next transform would process.

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::pipeline::status;
use crate::types::Result;

pub async fn run(ctx: &CommandContext, format: &str) -> Result<()> {
    let lock = ctx.load_lock().await?;
    let status = status::collect(&ctx.layout, &lock).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let out = Output::new();
    out.header("Documentation Status");
    out.field("Docs", ctx.display(ctx.layout.docs_dir()));
    out.field("Lock entries", status.lock_entries);
    out.field("Pending", status.pending_total());

    for lib in &status.libraries {
        out.header(&lib.name);
        out.field("Input pages", lib.input_pages);
        out.field("Pending", lib.pending.len());
        out.field("Output pages", lib.output_pages);
        out.field("Compiled", if lib.compiled { "yes" } else { "no" });
        for key in &lib.pending {
            out.info(key);
        }
    }

    if status.libraries.is_empty() {
        out.warning("No libraries found. Add docs/<library>/input/ and run again.");
    }

    Ok(())
}
