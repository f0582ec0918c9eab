//! Data format identification.

use crate::compression::strip_suffix;
use crate::error::{PeekError, Result};
use clap::ValueEnum;
use regex::RegexSet;
use std::fmt;
use std::sync::LazyLock;

/// Supported data formats, one canonical decoder per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
    Parquet,
    Avro,
    Orc,
    Text,
}

/// Logical extension patterns, indexed in [`Format`] declaration order.
/// Matched against the name with any compression suffix stripped.
static EXTENSIONS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)\.csv$",
        r"(?i)\.(json|jsonl|ndjson)$",
        r"(?i)\.parquet$",
        r"(?i)\.avro$",
        r"(?i)\.orc$",
        r"(?i)\.(txt|log)$",
    ])
    .expect("format extension patterns are valid")
});

const ALL: [Format; 6] = [
    Format::Csv,
    Format::Json,
    Format::Parquet,
    Format::Avro,
    Format::Orc,
    Format::Text,
];

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Parquet => "parquet",
            Self::Avro => "avro",
            Self::Orc => "orc",
            Self::Text => "text",
        }
    }

    /// Whether a file name carries this format's extension, ignoring case
    /// and one trailing compression suffix.
    pub fn matches(self, name: &str) -> bool {
        EXTENSIONS
            .matches(strip_suffix(name))
            .matched(ALL.iter().position(|f| *f == self).expect("format listed"))
    }

    /// Infer the format from a path's logical extension.
    pub fn from_path(path: &str) -> Result<Self> {
        let matches = EXTENSIONS.matches(strip_suffix(path));
        match matches.iter().next() {
            Some(idx) => Ok(ALL[idx]),
            None => Err(PeekError::UnsupportedFormat {
                path: path.to_string(),
            }),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
