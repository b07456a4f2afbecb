//! Checksum Lock File
//!
//! `io-lock.json` is a flat JSON object mapping root-relative input paths to
//! the checksum they had when last transformed. It is loaded once per run,
//! updated in memory and written back in full after every processed file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::checksum::ContentChecksum;
use crate::types::{OverloadError, Result};

#[derive(Debug, Clone)]
pub struct LockFile {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LockFile {
    /// Empty lock bound to `path` (nothing is read)
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Read the lock file; a missing file is an empty lock
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No lock file at {}, starting empty", path.display());
                return Ok(Self::empty(path));
            }
            Err(e) => return Err(OverloadError::read(path, e)),
        };

        if content.trim().is_empty() {
            return Ok(Self::empty(path));
        }

        let entries: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|e| OverloadError::LockFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        debug!("Loaded {} lock entries from {}", entries.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// True when `key` was last processed with exactly this content
    pub fn is_fresh(&self, key: &str, checksum: &ContentChecksum) -> bool {
        self.get(key).is_some_and(|stored| checksum.matches(stored))
    }

    pub fn record(&mut self, key: impl Into<String>, checksum: &ContentChecksum) {
        self.entries.insert(key.into(), checksum.as_str().to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Replace the file on disk with the full mapping.
    ///
    /// Written to a sibling temp file first, then renamed over the target.
    pub async fn save(&self) -> Result<()> {
        let json = self.to_json()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OverloadError::write(parent, e))?;
        }

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| OverloadError::write(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| OverloadError::write(&self.path, e))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
