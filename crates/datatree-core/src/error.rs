//! Error types for tree construction and lookup.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Abstract category of a failure.
///
/// Every error in the workspace maps onto one of these, so callers can branch
/// on the category without matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A label could not become a valid, unique, non-reserved name.
    Naming,
    /// A node was attached to a second parent, or its tree is gone.
    Ownership,
    /// Scalar data was read from or written to a container.
    TypeMismatch,
    /// A child or path lookup missed.
    Lookup,
    /// A document could not be decoded.
    Decode,
    /// The filesystem failed underneath a reader.
    Io,
    /// The read configuration is unusable.
    Config,
}

/// Errors raised by the node model, the object converter and the path resolver.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The slug derived from a label does not match the identifier grammar.
    #[error("{slug:?} is not an admissible name (label {label:?})")]
    InvalidName { slug: String, label: String },

    /// The slug collides with a reserved word or reserved pattern.
    #[error("{slug:?} is a reserved name (label {label:?})")]
    ReservedName { slug: String, label: String },

    /// A container already has a child with this name.
    #[error("children must have unique names: {name:?} already exists under {parent}")]
    DuplicateChild { name: CompactString, parent: String },

    /// A mapping key or primary-key value cannot be used as a label.
    #[error("invalid key under {parent:?}: {reason}")]
    InvalidKey { parent: String, reason: String },

    /// The node already has a parent, or attaching it would form a cycle.
    #[error("node {name:?} cannot be attached under {parent}: {reason}")]
    AlreadyAttached {
        name: CompactString,
        parent: String,
        reason: &'static str,
    },

    /// The node was attached to a tree whose owning handles have all been
    /// dropped, so its ancestors no longer exist.
    #[error("node {name:?} belongs to a tree that has been dropped")]
    Detached { name: CompactString },

    /// Scalar data was requested from or written to a container.
    #[error("container nodes cannot handle data directly: {url}")]
    ContainerData { url: String },

    /// A child lookup missed.
    #[error("{key:?} is not a child node of {url}")]
    NotFound { key: String, url: String },

    /// A requested ordering is not a permutation of the container's children.
    #[error("invalid ordering for {url}: {reason}")]
    InvalidOrdering { url: String, reason: String },
}

impl TreeError {
    /// The abstract category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName { .. }
            | Self::ReservedName { .. }
            | Self::DuplicateChild { .. }
            | Self::InvalidKey { .. }
            | Self::InvalidOrdering { .. } => ErrorKind::Naming,
            Self::AlreadyAttached { .. } | Self::Detached { .. } => ErrorKind::Ownership,
            Self::ContainerData { .. } => ErrorKind::TypeMismatch,
            Self::NotFound { .. } => ErrorKind::Lookup,
        }
    }

    /// Create a lookup miss for `key` under the node at `url`.
    pub fn not_found(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self::NotFound {
            key: key.into(),
            url: url.into(),
        }
    }

    /// Whether this is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
