//! Transformer
//!
//! Sends every changed input page through the model and writes the result to
//! the mirrored `output` path. A page is changed when its checksum differs
//! from the one recorded in the lock file. The lock is saved after each page,
//! so an interrupted run resumes where it stopped.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, instrument};

use super::checksum::ContentChecksum;
use super::layout::{Library, ProjectLayout, is_markdown, read_page, walk_files};
use super::lock::LockFile;
use crate::ai::{FallbackChain, ProgressSink, PromptTemplate, TextRequest};
use crate::config::TransformConfig;
use crate::types::{OverloadError, Result};

// =============================================================================
// Options & Report
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Pause after each processed page
    pub delay: Duration,
    /// Copy pages without `<...>` markup verbatim
    pub passthrough_plain: bool,
}

impl From<&TransformConfig> for TransformOptions {
    fn from(config: &TransformConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
            passthrough_plain: config.passthrough_plain,
        }
    }
}

/// Where a page's output text came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSource {
    Passthrough,
    Model {
        provider: String,
        model: String,
        fell_back: bool,
    },
}

#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source: OutputSource,
}

#[derive(Debug, Default)]
pub struct TransformReport {
    pub processed: Vec<ProcessedFile>,
    pub skipped: Vec<PathBuf>,
    /// Provider requests made, including fallback attempts
    pub calls: usize,
}

impl TransformReport {
    pub fn passthrough_count(&self) -> usize {
        self.processed
            .iter()
            .filter(|p| p.source == OutputSource::Passthrough)
            .count()
    }

    pub fn fallback_count(&self) -> usize {
        self.processed
            .iter()
            .filter(|p| matches!(p.source, OutputSource::Model { fell_back: true, .. }))
            .count()
    }
}

// =============================================================================
// Transformer
// =============================================================================

pub struct Transformer<'a> {
    layout: &'a ProjectLayout,
    chain: &'a FallbackChain,
    options: TransformOptions,
    /// Loaded on the first page that needs the model
    prompt: Option<PromptTemplate>,
}

impl<'a> Transformer<'a> {
    pub fn new(
        layout: &'a ProjectLayout,
        chain: &'a FallbackChain,
        options: TransformOptions,
    ) -> Self {
        Self {
            layout,
            chain,
            options,
            prompt: None,
        }
    }

    #[instrument(skip_all, fields(docs = %self.layout.docs_dir().display()))]
    pub async fn run(
        &mut self,
        lock: &mut LockFile,
        sink: &mut dyn ProgressSink,
    ) -> Result<TransformReport> {
        let mut report = TransformReport::default();

        for library in self.layout.libraries().await? {
            self.transform_library(&library, lock, sink, &mut report).await?;
        }

        info!(
            "Transform finished: {} processed, {} skipped, {} provider calls",
            report.processed.len(),
            report.skipped.len(),
            report.calls
        );
        Ok(report)
    }

    #[instrument(skip_all, fields(library = %library.name))]
    async fn transform_library(
        &mut self,
        library: &Library,
        lock: &mut LockFile,
        sink: &mut dyn ProgressSink,
        report: &mut TransformReport,
    ) -> Result<()> {
        let input = library.input_dir();
        if !input.is_dir() {
            debug!("No input directory, skipping");
            return Ok(());
        }

        for file in walk_files(&input)?.into_iter().filter(|f| is_markdown(f)) {
            self.transform_file(&file, lock, sink, report).await?;
        }
        Ok(())
    }

    async fn transform_file(
        &mut self,
        path: &Path,
        lock: &mut LockFile,
        sink: &mut dyn ProgressSink,
        report: &mut TransformReport,
    ) -> Result<()> {
        let key = self.layout.lock_key(path)?;
        let content = read_page(path).await?;
        let checksum = ContentChecksum::of(&content);

        if lock.is_fresh(&key, &checksum) {
            info!("Skipped {}", key);
            report.skipped.push(path.to_path_buf());
            return Ok(());
        }

        info!("Transforming {}", key);

        let (text, source) = if self.options.passthrough_plain && !contains_markup(&content) {
            debug!("No markup found, copying verbatim");
            (content, OutputSource::Passthrough)
        } else {
            let request = self.request_for(&content).await?;
            let generation = self.chain.generate(&request, sink).await?;
            report.calls += if generation.fell_back { 2 } else { 1 };
            let source = OutputSource::Model {
                provider: generation.provider,
                model: generation.model,
                fell_back: generation.fell_back,
            };
            (generation.text, source)
        };

        let output = self.layout.output_path_for(path)?;
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OverloadError::write(parent, e))?;
        }
        tokio::fs::write(&output, &text)
            .await
            .map_err(|e| OverloadError::write(&output, e))?;

        lock.record(key, &checksum);
        lock.save().await?;

        info!("Done: {}", output.display());
        report.processed.push(ProcessedFile {
            input: path.to_path_buf(),
            output,
            source,
        });

        if !self.options.delay.is_zero() {
            tokio::time::sleep(self.options.delay).await;
        }
        Ok(())
    }

    async fn request_for(&mut self, document: &str) -> Result<TextRequest> {
        let template = match self.prompt.take() {
            Some(template) => template,
            None => PromptTemplate::load(self.layout.prompt_file()).await?,
        };
        let request = template.request_for(document);
        self.prompt = Some(template);
        Ok(request)
    }
}

/// True when the text holds anything shaped like `<...>` (a tag, component,
/// comment or autolink)
pub fn contains_markup(text: &str) -> bool {
    let mut open: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match c {
            '<' => open = Some(i),
            '>' => {
                if open.is_some_and(|start| i > start + 1) {
                    return true;
                }
                open = None;
            }
            _ => {}
        }
    }
    false
}
