//! Error types for reading files and folders.

use std::path::PathBuf;

use datatree_core::{ErrorKind, TreeError};
use thiserror::Error;

/// A document that could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Errors that can occur while reading a tree.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A symbolic link leads back to a directory being read.
    #[error("Symbolic link loop at {path}")]
    SymlinkLoop { path: PathBuf },

    /// Directory enumeration failed.
    #[error("Error listing {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// No format reader handles this file.
    #[error("Unsupported file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// A document was malformed.
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// The decoded content could not become a tree.
    #[error("Invalid tree at {path}: {source}")]
    Tree {
        path: PathBuf,
        #[source]
        source: TreeError,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ReadError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Attach path context to a tree error.
    pub fn tree(path: impl Into<PathBuf>, source: TreeError) -> Self {
        Self::Tree {
            path: path.into(),
            source,
        }
    }

    /// Attach path context to a decode error.
    pub fn decode(path: impl Into<PathBuf>, source: impl Into<DecodeError>) -> Self {
        Self::Decode {
            path: path.into(),
            source: source.into(),
        }
    }

    /// The abstract category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied { .. }
            | Self::NotFound { .. }
            | Self::Io { .. }
            | Self::NotADirectory { .. }
            | Self::SymlinkLoop { .. }
            | Self::Walk { .. } => ErrorKind::Io,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::UnsupportedFormat { .. } | Self::InvalidConfig { .. } => ErrorKind::Config,
            Self::Tree { source, .. } => source.kind(),
        }
    }
}
