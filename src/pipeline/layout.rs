//! Project Layout
//!
//! Resolves configured paths against the project root, discovers libraries
//! and maps input pages onto their output mirrors.
//!
//! ```text
//! <docs_dir>/<library>/input/**   source pages
//! <docs_dir>/<library>/output/**  transformed pages
//! <public_dir>/<library>.md       compiled artifact
//! ```

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::layout;
use crate::types::{LibraryName, OverloadError, Result};

/// Configured paths resolved against the project root
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    docs_dir: PathBuf,
    public_dir: PathBuf,
    lock_file: PathBuf,
    prompt_file: PathBuf,
    /// Index of the `input`/`output` segment in a root-relative page path
    mirror_segment: usize,
}

impl ProjectLayout {
    pub fn new(root: &Path, config: &Config) -> Self {
        let paths = &config.paths;
        // `.` segments vanish from root-relative page paths, so they must not
        // shift the mirror segment either
        let docs_dir: PathBuf = paths
            .docs_dir
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        Self {
            root: root.to_path_buf(),
            mirror_segment: docs_dir.components().count() + 1,
            docs_dir: root.join(docs_dir),
            public_dir: root.join(&paths.public_dir),
            lock_file: root.join(&paths.lock_file),
            prompt_file: root.join(&paths.prompt_file),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn lock_file(&self) -> &Path {
        &self.lock_file
    }

    pub fn prompt_file(&self) -> &Path {
        &self.prompt_file
    }

    /// Root-relative, `/`-separated key used in the lock file
    pub fn lock_key(&self, path: &Path) -> Result<String> {
        lock_key(&self.root, path)
    }

    /// Absolute output path for an input page.
    ///
    /// Fails instead of returning a path that would overwrite the page itself.
    pub fn output_path_for(&self, input: &Path) -> Result<PathBuf> {
        let relative = input
            .strip_prefix(&self.root)
            .map_err(|_| OverloadError::InvalidPath(input.to_path_buf()))?;
        let mirrored = mirror_output_path(relative, self.mirror_segment);
        if mirrored == relative {
            return Err(OverloadError::InvalidPath(input.to_path_buf()));
        }
        Ok(self.root.join(mirrored))
    }

    /// Destination of a library's compiled file
    pub fn compiled_path(&self, library: &Library) -> PathBuf {
        self.public_dir.join(library.name.compiled_file_name())
    }

    /// Every library directory under the docs directory, in name order
    pub async fn libraries(&self) -> Result<Vec<Library>> {
        discover_libraries(&self.docs_dir).await
    }
}

// =============================================================================
// Libraries
// =============================================================================

/// A documentation collection: one directory under the docs directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    pub name: LibraryName,
    pub dir: PathBuf,
}

impl Library {
    pub fn input_dir(&self) -> PathBuf {
        self.dir.join(layout::INPUT_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.join(layout::OUTPUT_DIR)
    }
}

/// List library directories; plain files directly under `docs_dir` are ignored
pub async fn discover_libraries(docs_dir: &Path) -> Result<Vec<Library>> {
    let mut entries = match tokio::fs::read_dir(docs_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(OverloadError::Config(format!(
                "Docs directory not found: {}",
                docs_dir.display()
            )));
        }
        Err(e) => return Err(OverloadError::read(docs_dir, e)),
    };

    let mut libraries = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| OverloadError::read(docs_dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| OverloadError::read(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(LibraryName::new) else {
            warn!("Skipping library with non UTF-8 name: {}", entry.path().display());
            continue;
        };
        libraries.push(Library {
            name,
            dir: entry.path(),
        });
    }

    libraries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Found {} libraries in {}", libraries.len(), docs_dir.display());
    Ok(libraries)
}

// =============================================================================
// File Walking
// =============================================================================

/// Every regular file below `dir`, in ascending path order.
///
/// A missing directory yields no files. Hidden files and ignore files are not
/// special here: the docs tree is taken as-is.
pub fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_some_and(|t| t.is_file()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Page text; invalid UTF-8 is replaced rather than rejected
pub async fn read_page(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| OverloadError::read(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("{} is not valid UTF-8, decoding lossily", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

/// `.md` or `.mdx` (case-sensitive)
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| layout::MARKDOWN_EXTENSIONS.contains(&ext))
}

// =============================================================================
// Path Mapping
// =============================================================================

/// Root-relative path joined with `/`, e.g. `docs/reactjs/input/intro.md`
pub fn lock_key(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| OverloadError::InvalidPath(path.to_path_buf()))?;

    let parts = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| OverloadError::InvalidPath(path.to_path_buf()))?;

    Ok(parts.join("/"))
}

/// `docs/<lib>/input/...` → `docs/<lib>/output/...` with a `.md` extension
pub fn input_to_output(path: &Path) -> PathBuf {
    mirror_output_path(path, 2)
}

/// Replace the component at `segment` with `output` when it is `input`,
/// then force the `.md` extension. Other paths only get the extension change.
pub fn mirror_output_path(path: &Path, segment: usize) -> PathBuf {
    let mut mirrored: PathBuf = path
        .components()
        .enumerate()
        .map(|(i, c)| {
            if i == segment && c.as_os_str() == layout::INPUT_DIR {
                OsStr::new(layout::OUTPUT_DIR)
            } else {
                c.as_os_str()
            }
        })
        .collect();

    mirrored.set_extension(layout::OUTPUT_EXTENSION);
    mirrored
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_input_to_output() {
        assert_eq!(
            input_to_output(Path::new("docs/reactjs/input/guides/intro.md")),
            PathBuf::from("docs/reactjs/output/guides/intro.md")
        );
        assert_eq!(
            input_to_output(Path::new("docs/reactjs/input/guides/intro.mdx")),
            PathBuf::from("docs/reactjs/output/guides/intro.md")
        );
    }

    #[test]
    fn test_non_matching_path_only_changes_extension() {
        assert_eq!(
            input_to_output(Path::new("docs/input/reactjs/page.mdx")),
            PathBuf::from("docs/input/reactjs/page.md")
        );
        assert_eq!(
            input_to_output(Path::new("notes/readme")),
            PathBuf::from("notes/readme.md")
        );
    }

    #[test]
    fn test_mirror_respects_segment_index() {
        assert_eq!(
            mirror_output_path(Path::new("site/docs/vue/input/a/b.mdx"), 3),
            PathBuf::from("site/docs/vue/output/a/b.md")
        );
        // A nested directory called `input` below the library is left alone
        assert_eq!(
            mirror_output_path(Path::new("docs/vue/input/input/x.md"), 2),
            PathBuf::from("docs/vue/output/input/x.md")
        );
    }

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("a/b.md")));
        assert!(is_markdown(Path::new("a/b.mdx")));
        assert!(!is_markdown(Path::new("a/b.png")));
        assert!(!is_markdown(Path::new("a/b.MD")));
        assert!(!is_markdown(Path::new("a/md")));
    }

    #[test]
    fn test_lock_key_is_root_relative_with_slashes() {
        let root = Path::new("/project");
        let key = lock_key(root, &root.join("docs").join("react").join("input").join("a.md"))
            .unwrap();
        assert_eq!(key, "docs/react/input/a.md");

        assert!(lock_key(root, Path::new("/elsewhere/a.md")).is_err());
    }

    #[test]
    fn test_layout_output_path_for_nested_docs_dir() {
        let mut config = Config::default();
        config.paths.docs_dir = PathBuf::from("site/docs");
        let layout = ProjectLayout::new(Path::new("/p"), &config);

        let output = layout
            .output_path_for(Path::new("/p/site/docs/vue/input/guide.mdx"))
            .unwrap();
        assert_eq!(output, PathBuf::from("/p/site/docs/vue/output/guide.md"));
    }

    #[test]
    fn test_cur_dir_segments_do_not_shift_mirror() {
        let mut config = Config::default();
        config.paths.docs_dir = PathBuf::from("./site/./docs");
        let layout = ProjectLayout::new(Path::new("/p"), &config);

        assert_eq!(layout.docs_dir(), Path::new("/p/site/docs"));
        let output = layout
            .output_path_for(Path::new("/p/site/docs/vue/input/guide.md"))
            .unwrap();
        assert_eq!(output, PathBuf::from("/p/site/docs/vue/output/guide.md"));
    }

    #[test]
    fn test_output_path_for_refuses_to_return_the_input() {
        let layout = ProjectLayout::new(Path::new("/p"), &Config::default());
        let err = layout
            .output_path_for(Path::new("/p/docs/vue/guide.md"))
            .unwrap_err();
        assert!(matches!(err, OverloadError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_read_page_decodes_invalid_utf8_lossily() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.md");
        std::fs::write(&path, b"caf\xe9 menu").unwrap();

        assert_eq!(read_page(&path).await.unwrap(), "caf\u{FFFD} menu");
    }

    #[tokio::test]
    async fn test_discover_libraries_sorted_dirs_only() {
        let dir = TempDir::new().unwrap();
        for name in ["vue", "angular", "react"] {
            std::fs::create_dir_all(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("README.md"), "stray").unwrap();

        let libraries = discover_libraries(dir.path()).await.unwrap();
        let names: Vec<&str> = libraries.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["angular", "react", "vue"]);
        assert_eq!(libraries[0].input_dir(), dir.path().join("angular").join("input"));
    }

    #[tokio::test]
    async fn test_discover_libraries_missing_docs_dir() {
        let dir = TempDir::new().unwrap();
        let err = discover_libraries(&dir.path().join("docs")).await.unwrap_err();
        assert!(matches!(err, OverloadError::Config(_)));
    }

    #[test]
    fn test_walk_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("b/nested")).unwrap();
        std::fs::write(root.join("b/nested/z.md"), "").unwrap();
        std::fs::write(root.join("a.md"), "").unwrap();
        std::fs::write(root.join(".hidden.md"), "").unwrap();

        let files = walk_files(root).unwrap();
        let relative: Vec<PathBuf> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from(".hidden.md"),
                PathBuf::from("a.md"),
                PathBuf::from("b/nested/z.md"),
            ]
        );
    }

    #[test]
    fn test_walk_files_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(walk_files(&dir.path().join("absent")).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_mirror_swaps_segment_and_forces_md(
            lib in "[a-z][a-z0-9_-]{0,12}",
            dirs in proptest::collection::vec("[a-z0-9]{1,8}", 0..4),
            stem in "[a-z0-9]{1,10}",
            ext in prop_oneof![Just("md"), Just("mdx")],
        ) {
            let mut input = PathBuf::from("docs").join(&lib).join("input");
            for d in &dirs {
                input.push(d);
            }
            input.push(format!("{}.{}", stem, ext));

            let output = input_to_output(&input);

            let mut expected = PathBuf::from("docs").join(&lib).join("output");
            for d in &dirs {
                expected.push(d);
            }
            expected.push(format!("{}.md", stem));
            prop_assert_eq!(&output, &expected);

            // Output paths are fixed points
            prop_assert_eq!(input_to_output(&output), output);
        }
    }
}
