//! Top-level tree reading.

use std::time::Instant;

use datatree_core::{DataTree, ReadConfig, TreeStats};
use tracing::info;

use crate::error::ReadError;
use crate::folder::FolderReader;

/// Read the directory tree described by `config`.
pub fn read_tree(config: &ReadConfig) -> Result<DataTree, ReadError> {
    let start = Instant::now();
    let root_path = config
        .root
        .canonicalize()
        .map_err(|e| ReadError::io(&config.root, e))?;

    // Verify root is a directory
    if !root_path.is_dir() {
        return Err(ReadError::NotADirectory { path: root_path });
    }

    let reader = FolderReader::with_config(&root_path, config)?;
    let mut stats = TreeStats::new();
    let root = reader.read_with_stats(&mut stats)?;
    let read_duration = start.elapsed();

    info!(
        root = %root_path.display(),
        dirs = stats.dirs_read,
        files = stats.files_read,
        ignored = stats.files_ignored,
        excluded = stats.entries_excluded,
        elapsed_ms = read_duration.as_millis() as u64,
        "Read data tree"
    );

    Ok(DataTree::new(root, root_path, config.clone(), stats, read_duration))
}
