//! Read-only pipeline status per library.

use serde::Serialize;

use super::checksum::ContentChecksum;
use super::layout::{Library, ProjectLayout, is_markdown, read_page, walk_files};
use super::lock::LockFile;
use crate::types::Result;

#[derive(Debug, Clone, Serialize)]
pub struct LibraryStatus {
    pub name: String,
    /// Markdown pages under `input`
    pub input_pages: usize,
    /// Input pages whose checksum is missing from, or differs from, the lock
    pub pending: Vec<String>,
    /// Markdown pages under `output`
    pub output_pages: usize,
    pub compiled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectStatus {
    pub lock_entries: usize,
    pub libraries: Vec<LibraryStatus>,
}

impl ProjectStatus {
    pub fn pending_total(&self) -> usize {
        self.libraries.iter().map(|l| l.pending.len()).sum()
    }
}

pub async fn collect(layout: &ProjectLayout, lock: &LockFile) -> Result<ProjectStatus> {
    let mut libraries = Vec::new();
    for library in layout.libraries().await? {
        libraries.push(library_status(layout, lock, &library).await?);
    }
    Ok(ProjectStatus {
        lock_entries: lock.len(),
        libraries,
    })
}

async fn library_status(
    layout: &ProjectLayout,
    lock: &LockFile,
    library: &Library,
) -> Result<LibraryStatus> {
    let inputs: Vec<_> = walk_files(&library.input_dir())?
        .into_iter()
        .filter(|f| is_markdown(f))
        .collect();

    let mut pending = Vec::new();
    for file in &inputs {
        let content = read_page(file).await?;
        let key = layout.lock_key(file)?;
        if !lock.is_fresh(&key, &ContentChecksum::of(&content)) {
            pending.push(key);
        }
    }

    let output_pages = walk_files(&library.output_dir())?
        .iter()
        .filter(|f| is_markdown(f))
        .count();

    Ok(LibraryStatus {
        name: library.name.to_string(),
        input_pages: inputs.len(),
        pending,
        output_pages,
        compiled: layout.compiled_path(library).is_file(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reports_pending_pages() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for (rel, content) in [
            ("docs/react/input/a.md", "a"),
            ("docs/react/input/b.md", "b"),
            ("docs/react/input/skip.png", "x"),
            ("docs/react/output/a.md", "A"),
            ("public/docs/react.md", "A"),
        ] {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        std::fs::create_dir_all(root.join("docs/vue")).unwrap();

        let layout = ProjectLayout::new(root, &Config::default());
        let mut lock = LockFile::empty(layout.lock_file());
        lock.record("docs/react/input/a.md", &ContentChecksum::of("a"));

        let status = collect(&layout, &lock).await.unwrap();

        assert_eq!(status.lock_entries, 1);
        assert_eq!(status.pending_total(), 1);

        let react = &status.libraries[0];
        assert_eq!(react.name, "react");
        assert_eq!(react.input_pages, 2);
        assert_eq!(react.pending, vec!["docs/react/input/b.md".to_string()]);
        assert_eq!(react.output_pages, 1);
        assert!(react.compiled);

        let vue = &status.libraries[1];
        assert_eq!(vue.input_pages, 0);
        assert!(!vue.compiled);
    }
}
