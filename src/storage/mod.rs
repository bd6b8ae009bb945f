// src/storage/mod.rs

//! On-disk layout for scriptq.
//!
//! Two flat directories, both created on first use:
//! - the script store, holding uploaded scripts under their sanitized names
//! - the log archive, holding one `<id>.txt` file per completed task

pub mod archive;
pub mod scripts;

pub use archive::LogArchive;
pub use scripts::{ScriptStore, sanitize_file_name};

use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::errors::Result;

/// Create a storage directory if it does not exist yet.
pub(crate) async fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        info!(dir = %dir.display(), "directory does not exist, creating it");
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating directory '{}'", dir.display()))?;
    }
    Ok(())
}
