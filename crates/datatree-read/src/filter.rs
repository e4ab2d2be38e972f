//! Entry exclusion by name.

use datatree_core::{ReadConfig, compile_pattern};
use regex::Regex;

use crate::error::ReadError;

/// Skips directory entries whose base name matches any pattern at its start.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    patterns: Vec<Regex>,
}

impl ExclusionFilter {
    /// A filter that excludes nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Compile `patterns`.
    pub fn new<I, S>(patterns: I) -> Result<Self, ReadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                compile_pattern(p.as_ref()).map_err(|e| ReadError::InvalidConfig {
                    message: format!("invalid exclusion pattern {:?}: {e}", p.as_ref()),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// Compile the exclusion patterns of `config`.
    pub fn from_config(config: &ReadConfig) -> Result<Self, ReadError> {
        Self::new(&config.exclude_patterns)
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
