//! Data tree wrapper and read statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::config::ReadConfig;
use crate::container::ContainerNode;
use crate::error::TreeError;
use crate::node::Node;
use crate::resolve;

/// Summary statistics for a read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Directories turned into containers, the root included.
    pub dirs_read: u64,
    /// Files decoded by a format reader.
    pub files_read: u64,
    /// Files skipped because no format reader matched.
    pub files_ignored: u64,
    /// Entries skipped by an exclusion pattern.
    pub entries_excluded: u64,
    /// Deepest directory level entered (the root is 0).
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directory at `depth`.
    pub fn record_dir(&mut self, depth: u32) {
        self.dirs_read += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a decoded file.
    pub fn record_file(&mut self) {
        self.files_read += 1;
    }

    /// Record a file no reader handles.
    pub fn record_ignored(&mut self) {
        self.files_ignored += 1;
    }

    /// Record an excluded entry.
    pub fn record_excluded(&mut self) {
        self.entries_excluded += 1;
    }
}

/// A fully read tree with the configuration that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct DataTree {
    /// Root container, named after the root directory.
    pub root: ContainerNode,

    /// Root path that was read.
    pub root_path: PathBuf,

    /// When this read was performed.
    pub read_at: SystemTime,

    /// Duration of the read.
    pub read_duration: Duration,

    /// Read configuration used.
    pub config: ReadConfig,

    /// Summary statistics.
    pub stats: TreeStats,
}

impl DataTree {
    /// Create a new data tree.
    pub fn new(
        root: ContainerNode,
        root_path: PathBuf,
        config: ReadConfig,
        stats: TreeStats,
        read_duration: Duration,
    ) -> Self {
        Self {
            root,
            root_path,
            read_at: SystemTime::now(),
            read_duration,
            config,
            stats,
        }
    }

    /// Look up a node by its slash-delimited URL.
    pub fn get_by_url(&self, url: &str) -> Result<Node, TreeError> {
        resolve::get_by_url(&self.root, url)
    }

    /// Dictionary projection of the whole tree.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(self.root.get_dictionary())
    }
}
