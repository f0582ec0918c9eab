//! Compression detection and decompression.
//!
//! Codecs are detected from the file name suffix only; object storage reads
//! give us no cheap way to peek at magic bytes before committing to a full
//! fetch. Decompression always materializes the whole input and output,
//! matching the pipeline's whole-file read model.
//!
//! Gzip and bzip2 are always available. Zstd, lz4, and snappy are behind the
//! `compression-zstd`, `compression-lz4`, and `compression-snappy` features;
//! requesting one that is not compiled in yields a typed
//! [`PeekError::UnsupportedCodec`] rather than a runtime branch on an
//! availability flag.

use crate::error::{PeekError, Result};
use std::io::Read;

/// Supported compression kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Zstd,
    Lz4,
    Snappy,
    Bz2,
}

impl Compression {
    pub fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Zstd => "zstd",
            Self::Lz4 => "lz4",
            Self::Snappy => "snappy",
            Self::Bz2 => "bz2",
        }
    }
}

/// Suffix table, longest suffix first per codec so `.gzip` and `.zstd`
/// match before `.gz` and `.zst`.
const SUFFIXES: &[(&str, Compression)] = &[
    (".gzip", Compression::Gzip),
    (".gz", Compression::Gzip),
    (".zstd", Compression::Zstd),
    (".zst", Compression::Zstd),
    (".lz4", Compression::Lz4),
    (".snappy", Compression::Snappy),
    (".bz2", Compression::Bz2),
];

/// Detect the compression kind from a file name suffix, case-insensitively.
pub fn detect(name: &str) -> Option<Compression> {
    let lower = name.to_ascii_lowercase();
    SUFFIXES
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
        .map(|(_, kind)| *kind)
}

/// Remove exactly one trailing compression suffix, if present.
///
/// Used to recover the logical extension of a compressed file, so
/// `part-0001.csv.gz` infers as CSV.
pub fn strip_suffix(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    for (suffix, _) in SUFFIXES {
        if lower.ends_with(suffix) {
            return &name[..name.len() - suffix.len()];
        }
    }
    name
}

/// Decompress a fully-fetched object.
///
/// # Errors
///
/// [`PeekError::UnsupportedCodec`] when the codec is not compiled into this
/// build, [`PeekError::CorruptData`] when decompression itself fails.
pub fn decompress(data: &[u8], kind: Compression) -> Result<Vec<u8>> {
    match kind {
        Compression::Gzip => {
            let mut out = Vec::new();
            flate2::read::GzDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(|e| corrupt(kind, e))?;
            Ok(out)
        }
        Compression::Bz2 => {
            let mut out = Vec::new();
            bzip2::read::BzDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(|e| corrupt(kind, e))?;
            Ok(out)
        }
        Compression::Zstd => {
            #[cfg(feature = "compression-zstd")]
            {
                zstd::stream::decode_all(data).map_err(|e| corrupt(kind, e))
            }
            #[cfg(not(feature = "compression-zstd"))]
            {
                Err(PeekError::UnsupportedCodec {
                    codec: "zstd",
                    feature: "compression-zstd",
                })
            }
        }
        Compression::Lz4 => {
            #[cfg(feature = "compression-lz4")]
            {
                let mut out = Vec::new();
                lz4_flex::frame::FrameDecoder::new(data)
                    .read_to_end(&mut out)
                    .map_err(|e| corrupt(kind, e))?;
                Ok(out)
            }
            #[cfg(not(feature = "compression-lz4"))]
            {
                Err(PeekError::UnsupportedCodec {
                    codec: "lz4",
                    feature: "compression-lz4",
                })
            }
        }
        Compression::Snappy => {
            #[cfg(feature = "compression-snappy")]
            {
                snap::raw::Decoder::new()
                    .decompress_vec(data)
                    .map_err(|e| corrupt(kind, e))
            }
            #[cfg(not(feature = "compression-snappy"))]
            {
                Err(PeekError::UnsupportedCodec {
                    codec: "snappy",
                    feature: "compression-snappy",
                })
            }
        }
    }
}

fn corrupt(kind: Compression, err: impl std::fmt::Display) -> PeekError {
    PeekError::CorruptData {
        codec: kind.name(),
        message: err.to_string(),
    }
}
