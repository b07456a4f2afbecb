//! Cleaner
//!
//! Removes everything that is not Markdown from each library's `input`
//! tree. `output` trees are never touched.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use super::layout::{ProjectLayout, is_markdown, walk_files};
use crate::types::{OverloadError, Result};

#[derive(Debug, Default)]
pub struct CleanReport {
    pub libraries: usize,
    pub removed: Vec<PathBuf>,
}

#[instrument(skip_all, fields(docs = %layout.docs_dir().display()))]
pub async fn clean(layout: &ProjectLayout) -> Result<CleanReport> {
    let mut report = CleanReport::default();

    for library in layout.libraries().await? {
        report.libraries += 1;

        let input = library.input_dir();
        if !input.is_dir() {
            debug!("{}: no input directory, skipping", library.name);
            continue;
        }

        for file in walk_files(&input)? {
            if is_markdown(&file) {
                continue;
            }
            tokio::fs::remove_file(&file)
                .await
                .map_err(|e| OverloadError::write(&file, e))?;
            info!("Removed {}", file.display());
            report.removed.push(file);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "x").unwrap();
    }

    #[tokio::test]
    async fn test_removes_non_markdown_from_input_only() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "docs/react/input/intro.md");
        touch(root, "docs/react/input/guide/page.mdx");
        touch(root, "docs/react/input/guide/diagram.png");
        touch(root, "docs/react/input/_meta.json");
        touch(root, "docs/react/output/keep.png");
        touch(root, "docs/react/output/intro.md");

        let layout = ProjectLayout::new(root, &Config::default());
        let report = clean(&layout).await.unwrap();

        assert_eq!(report.libraries, 1);
        assert_eq!(report.removed.len(), 2);
        assert!(root.join("docs/react/input/intro.md").exists());
        assert!(root.join("docs/react/input/guide/page.mdx").exists());
        assert!(!root.join("docs/react/input/guide/diagram.png").exists());
        assert!(!root.join("docs/react/input/_meta.json").exists());
        assert!(root.join("docs/react/output/keep.png").exists());
    }

    #[tokio::test]
    async fn test_library_without_input_is_skipped() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "docs/empty/output/stale.txt");
        touch(root, "docs/react/input/notes.txt");

        let layout = ProjectLayout::new(root, &Config::default());
        let report = clean(&layout).await.unwrap();

        assert_eq!(report.libraries, 2);
        assert_eq!(report.removed, vec![root.join("docs/react/input/notes.txt")]);
        assert!(root.join("docs/empty/output/stale.txt").exists());
    }
}
