//! Reading a directory into a container.

use std::fs;
use std::path::{Path, PathBuf};

use datatree_core::{ContainerNode, PrimaryKeys, ReadConfig, TreeStats};
use jwalk::{Parallelism, WalkDir};
use tracing::{debug, trace};

use crate::error::ReadError;
use crate::file::FileReader;
use crate::filter::ExclusionFilter;
use crate::format::Format;

/// What a directory entry turned out to be.
enum EntryKind {
    Dir,
    File,
    Other,
}

/// Reads a directory into a container named after the directory.
///
/// Subdirectories become nested containers; files with a supported format
/// become the node their document converts to. Other files are ignored, and
/// entries matching an exclusion pattern are skipped entirely.
#[derive(Debug, Clone)]
pub struct FolderReader {
    path: PathBuf,
    filter: ExclusionFilter,
    primary_keys: PrimaryKeys,
    follow_symlinks: bool,
    max_depth: Option<u32>,
}

impl FolderReader {
    /// Create a reader for `path` with no exclusions or primary keys.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            filter: ExclusionFilter::none(),
            primary_keys: PrimaryKeys::none(),
            follow_symlinks: true,
            max_depth: None,
        }
    }

    /// Create a reader for `path` using the options of `config`.
    pub fn with_config(path: impl Into<PathBuf>, config: &ReadConfig) -> Result<Self, ReadError> {
        Ok(Self {
            path: path.into(),
            filter: ExclusionFilter::from_config(config)?,
            primary_keys: config.primary_keys.clone(),
            follow_symlinks: config.follow_symlinks,
            max_depth: config.max_depth,
        })
    }

    pub fn with_filter(mut self, filter: ExclusionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_primary_keys(mut self, keys: impl Into<PrimaryKeys>) -> Self {
        self.primary_keys = keys.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the directory tree.
    pub fn read(&self) -> Result<ContainerNode, ReadError> {
        self.read_with_stats(&mut TreeStats::new())
    }

    /// Read the directory tree, recording what was visited in `stats`.
    pub fn read_with_stats(&self, stats: &mut TreeStats) -> Result<ContainerNode, ReadError> {
        self.read_dir(&self.path, 0, &mut Vec::new(), stats)
    }

    fn read_dir(
        &self,
        dir: &Path,
        depth: u32,
        ancestors: &mut Vec<PathBuf>,
        stats: &mut TreeStats,
    ) -> Result<ContainerNode, ReadError> {
        debug!(path = %dir.display(), depth, "Reading directory");

        let container =
            ContainerNode::new(&dir_label(dir)).map_err(|e| ReadError::tree(dir, e))?;

        // Walk the resolved directory so symlinked directories are entered.
        let resolved = fs::canonicalize(dir).map_err(|e| ReadError::io(dir, e))?;
        if ancestors.contains(&resolved) {
            return Err(ReadError::SymlinkLoop {
                path: dir.to_path_buf(),
            });
        }
        stats.record_dir(depth);

        let walker = WalkDir::new(&resolved)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(false)
            .sort(true)
            .min_depth(1)
            .max_depth(1);

        for entry in walker {
            let entry = entry.map_err(|err| ReadError::Walk {
                path: dir.to_path_buf(),
                message: err.to_string(),
            })?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let path = dir.join(entry.file_name());

            if self.filter.is_excluded(&file_name) {
                trace!(path = %path.display(), "Excluded");
                stats.record_excluded();
                continue;
            }

            match self.classify(&path)? {
                EntryKind::Dir => {
                    if self.max_depth.is_some_and(|max| depth >= max) {
                        trace!(path = %path.display(), "Beyond maximum depth");
                        continue;
                    }
                    ancestors.push(resolved.clone());
                    let child = self.read_dir(&path, depth + 1, ancestors, stats);
                    ancestors.pop();
                    let child = child?;
                    container
                        .add_child(child)
                        .map_err(|e| ReadError::tree(&path, e))?;
                }
                EntryKind::File => match Format::for_name(&file_name) {
                    Some(format) => {
                        let node = FileReader::with_format(&path, format)
                            .with_primary_keys(self.primary_keys.clone())
                            .read()?;
                        stats.record_file();
                        container
                            .add_child(node)
                            .map_err(|e| ReadError::tree(&path, e))?;
                    }
                    None => {
                        trace!(path = %path.display(), "No reader for file");
                        stats.record_ignored();
                    }
                },
                EntryKind::Other => {
                    trace!(path = %path.display(), "Skipping special entry");
                }
            }
        }

        Ok(container)
    }

    fn classify(&self, path: &Path) -> Result<EntryKind, ReadError> {
        let metadata = if self.follow_symlinks {
            fs::metadata(path)
        } else {
            fs::symlink_metadata(path)
        };
        let metadata = match metadata {
            Ok(m) => m,
            // Dangling symlink, or the entry vanished mid-read.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(EntryKind::Other),
            Err(e) => return Err(ReadError::io(path, e)),
        };
        let file_type = metadata.file_type();
        Ok(if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        })
    }
}

fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use datatree_core::{ErrorKind, HIDDEN_PATTERN};
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("folder1")).unwrap();
        fs::create_dir(root.join("folder2")).unwrap();
        fs::write(root.join("folder1/document.yaml"), "title: One\n").unwrap();
        fs::write(root.join("folder2/document.yaml"), "title: Two\n").unwrap();
        fs::write(root.join("notadoc.txt"), "plain text").unwrap();
        fs::write(root.join(".excluded.yaml"), "secret: 1\n").unwrap();

        temp
    }

    #[test]
    fn test_read_folder() {
        let temp = create_test_tree();
        let reader = FolderReader::new(temp.path())
            .with_filter(ExclusionFilter::new([HIDDEN_PATTERN]).unwrap());

        let mut stats = TreeStats::new();
        let root = reader.read_with_stats(&mut stats).unwrap();

        let names: Vec<_> = root.iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, ["folder1", "folder2"]);
        let title = root
            .child("folder2")
            .unwrap()
            .child("document")
            .unwrap()
            .child("title")
            .unwrap();
        assert_eq!(title.to_string(), "Two");

        assert_eq!(stats.dirs_read, 3);
        assert_eq!(stats.files_read, 2);
        assert_eq!(stats.files_ignored, 1);
        assert_eq!(stats.entries_excluded, 1);
        assert_eq!(stats.max_depth, 1);
    }

    #[test]
    fn test_without_exclusions_dot_files_are_read() {
        let temp = create_test_tree();
        let root = FolderReader::new(temp.path()).read().unwrap();
        assert!(root.contains("_excluded"));
    }

    #[test]
    fn test_max_depth() {
        let temp = create_test_tree();
        let config = ReadConfig {
            max_depth: Some(0),
            ..ReadConfig::new(temp.path()).excluding_hidden()
        };
        let root = FolderReader::with_config(temp.path(), &config)
            .unwrap()
            .read()
            .unwrap();
        assert!(root.is_empty());
    }

    #[test]
    fn test_dir_and_file_name_collision() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("doc")).unwrap();
        fs::write(temp.path().join("doc.yaml"), "a: 1\n").unwrap();

        let err = FolderReader::new(temp.path()).read().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Naming);
    }

    #[test]
    fn test_decode_failure_aborts_read() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("good.yaml"), "a: 1\n").unwrap();
        fs::write(temp.path().join("bad.json"), "{\"a\": ").unwrap();

        let err = FolderReader::new(temp.path()).read().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_followed() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(temp.path().join("folder1"), temp.path().join("linked"))
            .unwrap();

        let root = FolderReader::new(temp.path())
            .with_filter(ExclusionFilter::new([HIDDEN_PATTERN]).unwrap())
            .read()
            .unwrap();
        let title = root
            .child("linked")
            .unwrap()
            .child("document")
            .unwrap()
            .child("title")
            .unwrap();
        assert_eq!(title.to_string(), "One");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("inner")).unwrap();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("inner/back")).unwrap();

        let err = FolderReader::new(temp.path()).read().unwrap_err();
        assert!(matches!(err, ReadError::SymlinkLoop { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("broken.yaml"))
            .unwrap();

        let root = FolderReader::new(temp.path()).read().unwrap();
        assert!(root.is_empty());
    }
}
