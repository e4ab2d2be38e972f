//! Reading a single document file.

use std::fs;
use std::path::{Path, PathBuf};

use datatree_core::{Node, PrimaryKeys, Value, parse_object};
use tracing::debug;

use crate::error::ReadError;
use crate::format::Format;

/// Reads one file into a node named after the file's base name without its
/// extension.
#[derive(Debug, Clone)]
pub struct FileReader {
    path: PathBuf,
    format: Format,
    primary_keys: PrimaryKeys,
}

impl FileReader {
    /// Create a reader for `path`, choosing the format by file name.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ReadError> {
        let path = path.into();
        let format = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(Format::for_name)
            .ok_or_else(|| ReadError::UnsupportedFormat { path: path.clone() })?;
        Ok(Self::with_format(path, format))
    }

    /// Create a reader for `path` decoding it as `format`.
    pub fn with_format(path: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            path: path.into(),
            format,
            primary_keys: PrimaryKeys::none(),
        }
    }

    /// Name sequence elements by `keys`.
    pub fn with_primary_keys(mut self, keys: impl Into<PrimaryKeys>) -> Self {
        self.primary_keys = keys.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Label the resulting node is named from.
    pub fn label(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Decode the file without building nodes.
    pub fn decode(&self) -> Result<Value, ReadError> {
        let text = fs::read_to_string(&self.path).map_err(|e| ReadError::io(&self.path, e))?;
        self.format
            .decode(&text)
            .map_err(|e| ReadError::decode(&self.path, e))
    }

    /// Decode the file and convert it into a node.
    pub fn read(&self) -> Result<Node, ReadError> {
        debug!(path = %self.path.display(), format = %self.format, "Reading file");
        let value = self.decode()?;
        parse_object(&self.label(), &value, self.primary_keys.clone())
            .map_err(|e| ReadError::tree(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datatree_core::ErrorKind;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_read_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Document.yaml", "title: Test\ntags: [a, b]\n");

        let node = FileReader::new(path).unwrap().read().unwrap();
        assert_eq!(node.name().as_str(), "document");
        assert_eq!(node.child("title").unwrap().to_string(), "Test");
        assert_eq!(node.child("tags").unwrap().child("id1").unwrap().to_string(), "b");
    }

    #[test]
    fn test_read_with_primary_keys() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "list.yaml",
            "- id: first\n  value: 1\n- slug: second\n  value: 2\n- value: 3\n",
        );

        let node = FileReader::new(path)
            .unwrap()
            .with_primary_keys(["id", "slug"])
            .read()
            .unwrap();
        let names: Vec<_> = node
            .as_container()
            .unwrap()
            .iter()
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(names, ["first", "second", "id2"]);
    }

    #[test]
    fn test_dotted_stem() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "release.notes.json", r#"{"v": 1}"#);
        let reader = FileReader::new(path).unwrap();
        assert_eq!(reader.format(), Format::Json);
        assert_eq!(reader.read().unwrap().name().as_str(), "release_notes");
    }

    #[test]
    fn test_unsupported_format() {
        let err = FileReader::new("/data/notadoc.txt").unwrap_err();
        assert!(matches!(err, ReadError::UnsupportedFormat { .. }));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.yaml", "a: [1, 2\n");
        let err = FileReader::new(path).unwrap().read().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = FileReader::new(dir.path().join("gone.yaml"))
            .unwrap()
            .read()
            .unwrap_err();
        assert!(matches!(err, ReadError::NotFound { .. }));
    }
}
