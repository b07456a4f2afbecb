//! Transform Command
//!
//! Runs changed input pages through the configured providers.

use crate::ai::{FallbackChain, NullSink, ProgressSink, StdoutSink};
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::pipeline::{OutputSource, TransformOptions, TransformReport, Transformer};
use crate::types::Result;

pub async fn run(ctx: &CommandContext, no_echo: bool) -> Result<TransformReport> {
    let chain = FallbackChain::from_config(&ctx.config.llm)?;
    let mut lock = ctx.load_lock().await?;

    let echo = ctx.config.transform.echo && !no_echo && !ctx.quiet;
    let mut stdout_sink = StdoutSink;
    let mut null_sink = NullSink;
    let sink: &mut dyn ProgressSink = if echo {
        &mut stdout_sink
    } else {
        &mut null_sink
    };

    let options = TransformOptions::from(&ctx.config.transform);
    let report = Transformer::new(&ctx.layout, &chain, options)
        .run(&mut lock, sink)
        .await?;

    print_summary(ctx, &report);
    Ok(report)
}

fn print_summary(ctx: &CommandContext, report: &TransformReport) {
    let out = Output::quiet(ctx.quiet);
    out.success(&format!(
        "Transform: {} processed, {} up to date, {} provider calls",
        report.processed.len(),
        report.skipped.len(),
        report.calls
    ));

    for file in &report.processed {
        let via = match &file.source {
            OutputSource::Passthrough => "copied".to_string(),
            OutputSource::Model {
                provider,
                model,
                fell_back: true,
            } => format!("{} / {} (fallback)", provider, model),
            OutputSource::Model {
                provider, model, ..
            } => format!("{} / {}", provider, model),
        };
        out.field(&ctx.display(&file.output).to_string(), via);
    }

    if report.fallback_count() > 0 {
        out.warning(&format!(
            "{} pages were too large for the primary provider",
            report.fallback_count()
        ));
    }
}
