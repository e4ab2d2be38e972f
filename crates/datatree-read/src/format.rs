//! File format registry.

use std::fmt;
use std::sync::LazyLock;

use datatree_core::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::delimited;
use crate::error::DecodeError;
use crate::yaml;

/// A supported document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Yaml,
    Json,
    Csv,
}

/// File name patterns, tried in order. The first match wins.
static DISPATCH: LazyLock<Vec<(Regex, Format)>> = LazyLock::new(|| {
    [
        (r"^.+\.ya?ml$", Format::Yaml),
        (r"^.+\.csv$", Format::Csv),
        (r"^.+\.json$", Format::Json),
    ]
    .into_iter()
    .map(|(pattern, format)| (Regex::new(pattern).expect("valid dispatch pattern"), format))
    .collect()
});

impl Format {
    /// All supported formats.
    pub const ALL: [Format; 3] = [Format::Yaml, Format::Json, Format::Csv];

    /// Select the format handling a file by its base name.
    pub fn for_name(file_name: &str) -> Option<Self> {
        DISPATCH
            .iter()
            .find(|(pattern, _)| pattern.is_match(file_name))
            .map(|(_, format)| *format)
    }

    /// Decode document text.
    ///
    /// JSON is decoded as YAML, of which it is a subset.
    pub fn decode(self, text: &str) -> Result<Value, DecodeError> {
        match self {
            Format::Yaml | Format::Json => Ok(yaml::decode(text)?),
            Format::Csv => Ok(delimited::decode(text)?),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
