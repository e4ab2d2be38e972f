//! datatree - Parse a directory of structured documents into one navigable tree.
//!
//! Every directory becomes a container node, every YAML, JSON or CSV file
//! becomes the node its document converts to, and every node is reachable by
//! a slash-delimited URL of slug names.
//!
//! ```rust,no_run
//! let tree = datatree::open_dir("/path/to/data").unwrap();
//! let title = tree.get_by_url("/folder1/document/title").unwrap();
//! assert_eq!(title.to_string(), "Test document");
//! ```

use std::path::Path;

pub use datatree_core::{
    Addressable, ContainerNode, DataTree, ErrorKind, HIDDEN_PATTERN, LiteralNode, Metadata, Node,
    PrimaryKeys, ReadConfig, ReadConfigBuilder, TreeError, TreeStats, VERBOSE_NAME, Value,
    get_by_url, parse_object, slug, slugify, url_segments,
};
pub use datatree_read::{
    DecodeError, ExclusionFilter, FileReader, FolderReader, Format, ReadError, read_tree,
};

/// Read the tree described by `config`.
pub fn open(config: &ReadConfig) -> Result<DataTree, ReadError> {
    read_tree(config)
}

/// Read the tree rooted at `path`, skipping dot-prefixed entries.
pub fn open_dir(path: impl AsRef<Path>) -> Result<DataTree, ReadError> {
    read_tree(&ReadConfig::new(path.as_ref()).excluding_hidden())
}
