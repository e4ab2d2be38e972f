//! File and folder readers for datatree.
//!
//! This crate turns YAML, JSON and CSV documents, and the directories that
//! hold them, into datatree nodes.
//!
//! # Overview
//!
//! - [`Format`] selects a decoder by file name
//! - [`FileReader`] converts one document into a node named after the file
//! - [`FolderReader`] converts a directory into a container, recursively
//! - [`read_tree`] reads a whole tree from a [`ReadConfig`]
//!
//! # Example
//!
//! ```rust,no_run
//! use datatree_read::{ReadConfig, read_tree};
//!
//! let config = ReadConfig::new("/path/to/data").excluding_hidden();
//! let tree = read_tree(&config).unwrap();
//!
//! let title = tree.get_by_url("/folder1/document/title").unwrap();
//! println!("{title}");
//! ```

mod delimited;
mod error;
mod file;
mod filter;
mod folder;
mod format;
mod reader;
mod yaml;

pub use error::{DecodeError, ReadError};
pub use file::FileReader;
pub use filter::ExclusionFilter;
pub use folder::FolderReader;
pub use format::Format;
pub use reader::read_tree;

// Re-export core types for convenience
pub use datatree_core::{
    Addressable, ContainerNode, DataTree, ErrorKind, HIDDEN_PATTERN, LiteralNode, Node, PrimaryKeys,
    ReadConfig, TreeError, TreeStats, Value,
};
