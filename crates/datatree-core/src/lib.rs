//! Core types for datatree.
//!
//! This crate provides the node model (containers and literals), slug
//! normalization, the conversion of decoded values into nodes, and URL-based
//! lookup over the resulting tree.

mod config;
mod container;
mod convert;
mod error;
mod node;
mod resolve;
pub mod slug;
mod tree;
mod value;

pub use config::{HIDDEN_PATTERN, ReadConfig, ReadConfigBuilder, compile_pattern};
pub use container::ContainerNode;
pub use convert::{PrimaryKeys, parse_object};
pub use error::{ErrorKind, TreeError};
pub use node::{Addressable, LiteralNode, Metadata, Node, VERBOSE_NAME};
pub use resolve::{get_by_url, url_segments};
pub use slug::slugify;
pub use tree::{DataTree, TreeStats};
pub use value::{Value, float_text};
