// src/storage/scripts.rs

//! Uploaded script persistence and file name sanitization.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::errors::Result;

/// Characters replaced with `_` in uploaded file names.
///
/// Covers path separators plus the characters Windows refuses in file names,
/// so a sanitized name is always a single safe path component.
const UNSAFE_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Replace unsafe characters in an uploaded file name with `_`.
///
/// The sanitized name doubles as the task id, so this is also what keeps
/// task ids free of path separators.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Flat on-disk store for uploaded scripts.
#[derive(Debug, Clone)]
pub struct ScriptStore {
    dir: PathBuf,
}

impl ScriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ScriptStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist an uploaded script under its (already sanitized) file name,
    /// creating the scripts directory on first use.
    ///
    /// Re-uploading the same name overwrites the previous file; the newest
    /// upload wins.
    pub async fn save(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
        super::ensure_dir(&self.dir).await?;

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("writing script file '{}'", path.display()))?;

        debug!(path = %path.display(), bytes = contents.len(), "stored uploaded script");
        Ok(path)
    }
}
