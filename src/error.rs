//! Error types for the preview pipeline.
//!
//! Selection-stage failures (empty directory, nothing readable) are fatal.
//! Per-file decode and codec failures during multi-file reading are caught by
//! the reader and reported as warnings. WHERE-clause and column-projection
//! problems are surfaced to the caller immediately. Nothing in this crate
//! retries; retry and backoff belong to the storage backend.

use std::error::Error;
use std::fmt;

/// Failure taxonomy for the preview pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeekError {
    /// The listed prefix contained no files at all.
    EmptyDirectory { prefix: String },
    /// The prefix contained files, but all of them were zero bytes.
    NoNonEmptyFiles { prefix: String },
    /// Budget-based selection could not pick any file.
    NoSuitableFiles { prefix: String },
    /// No file contributed any rows during a multi-file read.
    NoDataRead,
    /// A compression codec was requested that this build does not carry.
    UnsupportedCodec { codec: &'static str, feature: &'static str },
    /// Decompression itself failed.
    CorruptData { codec: &'static str, message: String },
    /// A format decoder rejected its input.
    Decode { format: &'static str, message: String },
    /// Column projection matched none of the requested columns.
    NoMatchingColumns { available: Vec<String> },
    /// A WHERE clause referenced a column that is not in the result.
    UnknownColumn { column: String },
    /// A WHERE clause did not match any known operator shape.
    InvalidWhereClause { clause: String },
    /// The format could not be inferred from the path.
    UnsupportedFormat { path: String },
    /// The path scheme is not one of gs/gcs, s3, az/azure.
    UnsupportedScheme { scheme: String },
    /// A storage backend operation failed.
    Storage { message: String },
}

impl fmt::Display for PeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDirectory { prefix } => {
                write!(f, "no files found in {prefix}")
            }
            Self::NoNonEmptyFiles { prefix } => {
                write!(f, "no non-empty files found in {prefix}")
            }
            Self::NoSuitableFiles { prefix } => {
                write!(f, "no suitable files found in {prefix}")
            }
            Self::NoDataRead => {
                write!(f, "no data could be read from any of the files")
            }
            Self::UnsupportedCodec { codec, feature } => {
                write!(
                    f,
                    "{codec} support is not compiled in (rebuild with the '{feature}' feature)"
                )
            }
            Self::CorruptData { codec, message } => {
                write!(f, "{codec} decompression failed: {message}")
            }
            Self::Decode { format, message } => {
                write!(f, "failed to decode {format} data: {message}")
            }
            Self::NoMatchingColumns { available } => {
                write!(
                    f,
                    "none of the requested columns exist; available: {}",
                    available.join(", ")
                )
            }
            Self::UnknownColumn { column } => {
                write!(f, "column '{column}' does not exist in the result")
            }
            Self::InvalidWhereClause { clause } => {
                write!(f, "could not parse where clause '{clause}'")
            }
            Self::UnsupportedFormat { path } => {
                write!(
                    f,
                    "could not infer format from path: {path} (specify --input-format)"
                )
            }
            Self::UnsupportedScheme { scheme } => {
                write!(
                    f,
                    "unsupported scheme '{scheme}': use gs://, s3://, or az://"
                )
            }
            Self::Storage { message } => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for PeekError {}

pub type Result<T> = std::result::Result<T, PeekError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_feature_for_missing_codecs() {
        let err = PeekError::UnsupportedCodec {
            codec: "zstd",
            feature: "compression-zstd",
        };
        let msg = err.to_string();
        assert!(msg.contains("zstd"));
        assert!(msg.contains("compression-zstd"));
    }

    #[test]
    fn display_lists_available_columns() {
        let err = PeekError::NoMatchingColumns {
            available: vec!["id".into(), "name".into()],
        };
        assert!(err.to_string().contains("id, name"));
    }
}
