// src/storage/archive.rs

//! Durable per-task output archive.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::errors::Result;

/// Suffix for archived output files.
pub const LOG_SUFFIX: &str = ".txt";

/// Archive of captured task output: one `<id>.txt` file per completed task.
///
/// Writes happen exactly once per task, after the run finishes; reads and
/// listings can happen at any time.
#[derive(Debug, Clone)]
pub struct LogArchive {
    dir: PathBuf,
}

impl LogArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LogArchive { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}{LOG_SUFFIX}"))
    }

    /// Write the full captured output of a completed task, creating the
    /// logs directory on first use. Overwrites any previous run's file for
    /// the same id.
    pub async fn write(&self, id: &str, content: &[u8]) -> Result<()> {
        super::ensure_dir(&self.dir).await?;

        let path = self.path_for(id);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("writing log file '{}'", path.display()))?;

        debug!(task = %id, path = %path.display(), bytes = content.len(), "archived task output");
        Ok(())
    }

    /// Full captured output of a completed task, or `None` if no log file
    /// exists for that id.
    pub async fn read(&self, id: &str) -> Result<Option<Vec<u8>>> {
        self.read_file(&format!("{id}{LOG_SUFFIX}")).await
    }

    /// Read an archive entry by its literal file name (e.g. `a.py.txt`).
    ///
    /// The archive is a flat directory: names with path separators, and the
    /// bare `.`/`..` components, never match anything. Interior dots are
    /// legal, so `a..py.txt` is a readable entry name.
    pub async fn read_file(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        if file_name.contains(['/', '\\']) || matches!(file_name, "" | "." | "..") {
            return Ok(None);
        }

        match tokio::fs::read(self.dir.join(file_name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// File names of all archived entries, sorted. A missing logs directory
    /// reads as an empty archive.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().await?.is_file() && name.ends_with(LOG_SUFFIX) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}
