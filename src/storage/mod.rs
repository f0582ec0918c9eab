//! Object storage access.
//!
//! The pipeline only ever needs two operations from a backend: list the
//! `(name, size)` pairs under a prefix, and fetch one object in full. The
//! [`ObjectStore`] trait captures exactly that, synchronously by design —
//! backends may run an async client internally, but the pipeline is
//! single-threaded and blocking and the runtime never leaks out of this
//! module.
//!
//! Backends are selected by the path scheme (`gs://`/`gcs://`, `s3://`,
//! `az://`/`azure://`), one canonical implementation per provider. The
//! in-memory [`fake::FakeStore`] backs the test suite.

pub mod fake;
pub mod remote;

use crate::config::CloudOptions;
use crate::error::{PeekError, Result};
use std::fmt;

/// One listed object: full key and size in bytes.
///
/// Listing order is backend-defined; the selection engine re-sorts by name
/// before any decision is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Minimal storage interface the pipeline depends on.
pub trait ObjectStore {
    /// List `(name, size)` pairs under a prefix. No ordering guarantee.
    fn list(&self, prefix: &str) -> Result<Vec<FileEntry>>;

    /// Fetch one object in full.
    fn fetch(&self, key: &str) -> Result<Vec<u8>>;
}

/// Cloud provider, keyed by URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Gcs,
    S3,
    Azure,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gcs => "gcs",
            Self::S3 => "s3",
            Self::Azure => "azure",
        })
    }
}

/// A parsed `scheme://bucket/key` path.
///
/// Directory mode is signaled purely by a trailing `/` on the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudPath {
    pub scheme: Scheme,
    pub bucket: String,
    pub key: String,
}

impl CloudPath {
    pub fn is_directory(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// Parse a cloud storage URL into scheme, bucket/container, and object key.
pub fn parse_cloud_path(path: &str) -> Result<CloudPath> {
    let (scheme_str, rest) = path.split_once("://").ok_or_else(|| {
        PeekError::UnsupportedScheme {
            scheme: path.to_string(),
        }
    })?;
    let scheme = match scheme_str.to_ascii_lowercase().as_str() {
        "gs" | "gcs" => Scheme::Gcs,
        "s3" => Scheme::S3,
        "az" | "azure" => Scheme::Azure,
        other => {
            return Err(PeekError::UnsupportedScheme {
                scheme: other.to_string(),
            });
        }
    };
    let (bucket, key) = match rest.split_once('/') {
        Some((bucket, key)) => (bucket, key),
        None => (rest, ""),
    };
    if bucket.is_empty() {
        return Err(PeekError::Storage {
            message: format!("missing bucket or container name in path: {path}"),
        });
    }
    Ok(CloudPath {
        scheme,
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}

/// Build the backend for a parsed path.
pub fn connect(path: &CloudPath, options: &CloudOptions) -> Result<Box<dyn ObjectStore>> {
    let store = remote::RemoteStore::connect(path.scheme, &path.bucket, options)?;
    Ok(Box::new(store))
}
