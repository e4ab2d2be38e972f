//! Read configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::convert::PrimaryKeys;

/// Exclusion pattern matching dot-prefixed entries.
pub const HIDDEN_PATTERN: &str = r"^\..*$";

/// Configuration for reading a directory into a tree.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ReadConfig {
    /// Root directory to read.
    pub root: PathBuf,

    /// Regular expressions matched against the start of each entry's base
    /// name. Matching entries are skipped.
    #[builder(default)]
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Field names used to name sequence elements, in priority order.
    #[builder(default)]
    #[serde(default)]
    pub primary_keys: PrimaryKeys,

    /// Classify entries by the target of symbolic links.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub follow_symlinks: bool,

    /// Maximum directory depth to enter (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl ReadConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.root {
            Some(root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            Some(_) => {}
            None => return Err("Root path is required".to_string()),
        }
        for pattern in self.exclude_patterns.iter().flatten() {
            compile_pattern(pattern).map_err(|e| format!("Invalid pattern {pattern:?}: {e}"))?;
        }
        Ok(())
    }
}

impl ReadConfig {
    /// Create a new read config builder.
    pub fn builder() -> ReadConfigBuilder {
        ReadConfigBuilder::default()
    }

    /// Create a simple config for reading a directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_patterns: Vec::new(),
            primary_keys: PrimaryKeys::none(),
            follow_symlinks: true,
            max_depth: None,
        }
    }

    /// Also skip dot-prefixed entries.
    pub fn excluding_hidden(mut self) -> Self {
        if !self.exclude_patterns.iter().any(|p| p == HIDDEN_PATTERN) {
            self.exclude_patterns.push(HIDDEN_PATTERN.to_string());
        }
        self
    }

    /// Use `keys` to name sequence elements.
    pub fn with_primary_keys(mut self, keys: impl Into<PrimaryKeys>) -> Self {
        self.primary_keys = keys.into();
        self
    }

    /// Compile the exclusion patterns.
    pub fn compiled_patterns(&self) -> Result<Vec<Regex>, regex::Error> {
        self.exclude_patterns
            .iter()
            .map(|p| compile_pattern(p))
            .collect()
    }
}

/// Compile an exclusion pattern so that it only matches at the start of a name.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})"))
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
