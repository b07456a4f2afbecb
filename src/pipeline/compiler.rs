//! Compiler
//!
//! Concatenates each library's pages into `<public_dir>/<library>.md`.
//! Transformed pages are preferred; a library whose `output` tree is missing
//! or empty is compiled from its `input` tree instead.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use super::layout::{Library, ProjectLayout, is_markdown, lock_key, read_page, walk_files};
use crate::constants::layout::DOCUMENT_SEPARATOR;
use crate::types::{LibraryName, OverloadError, Result};

/// Which tree a compiled file was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileSource {
    Output,
    Input,
    /// Neither tree had any pages
    Empty,
}

impl std::fmt::Display for CompileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Output => write!(f, "output"),
            Self::Input => write!(f, "input"),
            Self::Empty => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompiledLibrary {
    pub name: LibraryName,
    pub source: CompileSource,
    pub files: usize,
    pub bytes: usize,
    pub destination: PathBuf,
}

#[derive(Debug, Default)]
pub struct CompileReport {
    pub libraries: Vec<CompiledLibrary>,
}

pub struct Compiler<'a> {
    layout: &'a ProjectLayout,
    markdown_only: bool,
}

impl<'a> Compiler<'a> {
    pub fn new(layout: &'a ProjectLayout, markdown_only: bool) -> Self {
        Self {
            layout,
            markdown_only,
        }
    }

    #[instrument(skip_all, fields(public = %self.layout.public_dir().display()))]
    pub async fn run(&self) -> Result<CompileReport> {
        let libraries = self.layout.libraries().await?;

        let public_dir = self.layout.public_dir();
        tokio::fs::create_dir_all(public_dir)
            .await
            .map_err(|e| OverloadError::write(public_dir, e))?;

        let mut report = CompileReport::default();
        for library in &libraries {
            report.libraries.push(self.compile_library(library).await?);
        }
        Ok(report)
    }

    #[instrument(skip_all, fields(library = %library.name))]
    async fn compile_library(&self, library: &Library) -> Result<CompiledLibrary> {
        let (source, files) = self.select_files(library)?;

        let mut documents = Vec::with_capacity(files.len());
        for file in &files {
            documents.push(read_page(file).await?);
        }
        let compiled = documents.join(DOCUMENT_SEPARATOR);

        let destination = self.layout.compiled_path(library);
        tokio::fs::write(&destination, &compiled)
            .await
            .map_err(|e| OverloadError::write(&destination, e))?;

        if source == CompileSource::Empty {
            warn!("{} has no pages, wrote empty {}", library.name, destination.display());
        } else {
            info!(
                "Compiled {} pages from {} into {}",
                files.len(),
                source,
                destination.display()
            );
        }

        Ok(CompiledLibrary {
            name: library.name.clone(),
            source,
            files: files.len(),
            bytes: compiled.len(),
            destination,
        })
    }

    /// Pages from `output`, else from `input`, in descending path order
    fn select_files(&self, library: &Library) -> Result<(CompileSource, Vec<PathBuf>)> {
        let output = self.pages(&library.output_dir())?;
        let (source, mut files) = if !output.is_empty() {
            (CompileSource::Output, output)
        } else {
            let input = self.pages(&library.input_dir())?;
            if input.is_empty() {
                (CompileSource::Empty, input)
            } else {
                debug!("No output pages, compiling from input");
                (CompileSource::Input, input)
            }
        };

        sort_descending(self.layout.root(), &mut files)?;
        Ok((source, files))
    }

    fn pages(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = walk_files(dir)?;
        if self.markdown_only {
            files.retain(|f| is_markdown(f));
        }
        Ok(files)
    }
}

/// Order by the root-relative `/`-joined path string, greatest first
fn sort_descending(root: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut keyed = files
        .drain(..)
        .map(|f| lock_key(root, &f).map(|key| (key, f)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    files.extend(keyed.into_iter().map(|(_, f)| f));
    Ok(())
}
