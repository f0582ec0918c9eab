//! # cloudpeek
//!
//! Preview data files in **Google Cloud Storage**, **AWS S3**, or **Azure
//! Blob Storage** directly from your terminal — no manual download, no
//! notebook.
//!
//! ## What it does
//!
//! - **Format inference** from the path: CSV, JSON/JSON Lines, Parquet,
//!   Avro, ORC, and plain text
//! - **Transparent decompression** of `.gz`, `.zst`, `.lz4`, `.snappy`,
//!   and `.bz2` objects
//! - **Bounded reads**: every decoder receives one row budget, so small
//!   previews of large files stay cheap
//! - **Directory mode**: a trailing `/` lists the prefix, skips metadata
//!   artifacts (`_SUCCESS`, `.crc`, …), and reads one file or several up to
//!   a byte budget, stitching the results into one table with a merged
//!   schema
//! - **Row filtering** with a small WHERE grammar
//!   (`status=active`, `age>=30`, `name contains john`)
//! - **Rendering** as a table, JSON lines, pretty JSON, or CSV, plus an
//!   optional total record count
//!
//! ## Pipeline shape
//!
//! ```text
//! path ─▶ storage backend ─▶ file selection ─▶ bounded read ─▶ filter ─▶ render
//!                (list/fetch)    (sort, skip,     (decompress,
//!                                 byte budget)     decode, stitch)
//! ```
//!
//! Everything runs on one thread, strictly sequentially. Files are fetched
//! whole and decoded in memory; peak memory is bounded by the largest
//! single decoded file plus the accumulated preview rows.
//!
//! ## Module Overview
//!
//! - [`storage`] - backend trait, path parsing, GCS/S3/Azure clients
//! - [`select`] - file selection for directory prefixes
//! - [`read`] - per-format decoders and the bounded single/multi-file readers
//! - [`compression`] - codec detection and decompression
//! - [`filter`] - WHERE-clause parsing and application
//! - [`table`] - row, schema, and schema-merge model
//! - [`render`] - terminal output
//! - [`cli`] - command-line surface and orchestration

pub mod cli;
pub mod compression;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod read;
pub mod render;
pub mod select;
pub mod storage;
pub mod table;

// General re-exports
pub use config::CloudOptions;
pub use error::{PeekError, Result};
pub use format::Format;
pub use read::{Decoded, FormatOptions, read_multi_file, read_single_file};
pub use select::{MultiFileMode, SelectionCriteria};
pub use storage::{CloudPath, FileEntry, ObjectStore, Scheme, parse_cloud_path};
pub use table::{ResultTable, Row, Schema, TypeTag};
