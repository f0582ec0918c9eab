//! Bounded readers: fetch, decompress, decode, and stitch.
//!
//! Every decoder follows the same contract: bytes in, at most `row_budget`
//! rows out (`0` = everything), plus the *full* schema of the source. Column
//! projection narrows row content only — the schema stays unprojected so
//! schema display and cross-file merging always see the whole shape.
//!
//! The two readers wrap that contract:
//! - [`read_single_file`] folds offset and limit into one budget and slices
//!   the offset off locally.
//! - [`read_multi_file`] walks an ordered file list, carrying the remaining
//!   offset across file boundaries and stopping (without opening further
//!   streams) once the limit is satisfied. Per-file failures are warnings;
//!   the read only fails when no file contributed anything.

pub mod csv;
pub mod json;
pub mod text;

#[cfg(any(feature = "io-parquet", feature = "io-orc"))]
pub(crate) mod batches;

#[cfg(feature = "io-avro")]
pub mod avro;
#[cfg(feature = "io-orc")]
pub mod orc;
#[cfg(feature = "io-parquet")]
pub mod parquet;

use crate::compression;
use crate::error::{PeekError, Result};
use crate::format::Format;
use crate::storage::{FileEntry, ObjectStore};
use crate::table::{ResultTable, Row, Schema};
use log::{info, warn};

/// Per-format knobs. Only CSV has any today.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// CSV field delimiter; `None` means comma.
    pub delimiter: Option<u8>,
}

/// One decoder invocation: projected rows plus the full source schema.
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub rows: Vec<Row>,
    pub schema: Schema,
}

/// The single row cap every decoder receives. Offset and limit are folded
/// into it; decoders never see them separately. `0` means unbounded.
pub fn row_budget(offset: usize, limit: usize) -> usize {
    if limit > 0 { offset + limit } else { 0 }
}

/// Decode one buffer with the named format.
pub fn decode(
    format: Format,
    data: &[u8],
    budget: usize,
    columns: Option<&[String]>,
    options: &FormatOptions,
) -> Result<Decoded> {
    match format {
        Format::Csv => csv::decode(data, budget, columns, options),
        Format::Json => json::decode(data, budget, columns),
        Format::Text => text::decode(data, budget, columns),
        Format::Parquet => {
            #[cfg(feature = "io-parquet")]
            {
                parquet::decode(data, budget, columns)
            }
            #[cfg(not(feature = "io-parquet"))]
            {
                Err(not_compiled("parquet", "io-parquet"))
            }
        }
        Format::Avro => {
            #[cfg(feature = "io-avro")]
            {
                avro::decode(data, budget, columns)
            }
            #[cfg(not(feature = "io-avro"))]
            {
                Err(not_compiled("avro", "io-avro"))
            }
        }
        Format::Orc => {
            #[cfg(feature = "io-orc")]
            {
                orc::decode(data, budget, columns)
            }
            #[cfg(not(feature = "io-orc"))]
            {
                Err(not_compiled("orc", "io-orc"))
            }
        }
    }
}

#[allow(dead_code)]
fn not_compiled(format: &'static str, feature: &'static str) -> PeekError {
    PeekError::Decode {
        format,
        message: format!("{format} support is not compiled in (rebuild with the '{feature}' feature)"),
    }
}

/// Fetch, decompress if the name calls for it, and decode.
pub fn fetch_decoded(
    store: &dyn ObjectStore,
    key: &str,
    format: Format,
    budget: usize,
    columns: Option<&[String]>,
    options: &FormatOptions,
) -> Result<Decoded> {
    let mut data = store.fetch(key)?;
    if let Some(kind) = compression::detect(key) {
        info!("detected {} compression, decompressing", kind.name());
        data = compression::decompress(&data, kind)?;
    }
    decode(format, &data, budget, columns, options)
}

/// Read one object, applying offset and limit locally.
pub fn read_single_file(
    store: &dyn ObjectStore,
    key: &str,
    format: Format,
    offset: usize,
    limit: usize,
    columns: Option<&[String]>,
    options: &FormatOptions,
) -> Result<ResultTable> {
    let budget = row_budget(offset, limit);
    let Decoded { mut rows, schema } = fetch_decoded(store, key, format, budget, columns, options)?;
    if offset > 0 {
        if offset >= rows.len() {
            warn!(
                "offset ({offset}) >= total rows read ({}); no data to display",
                rows.len()
            );
            rows.clear();
        } else {
            rows.drain(..offset);
        }
    }
    Ok(ResultTable::new(rows, schema))
}

/// Read an ordered file list as one logical table.
///
/// Returns the assembled table plus the total number of rows decoded across
/// all files before any offset/limit trimming, for reporting.
pub fn read_multi_file(
    store: &dyn ObjectStore,
    files: &[FileEntry],
    format: Format,
    offset: usize,
    limit: usize,
    columns: Option<&[String]>,
    options: &FormatOptions,
) -> Result<(ResultTable, u64)> {
    let mut remaining_offset = offset;
    let mut accumulated: Vec<Row> = Vec::new();
    let mut merged = Schema::new();
    let mut total_rows: u64 = 0;
    let mut rows_skipped: usize = 0;

    for entry in files {
        // Once the limit is satisfied, remaining files are never opened.
        if limit > 0 && accumulated.len() >= limit {
            break;
        }
        let budget = if limit > 0 {
            remaining_offset + (limit - accumulated.len())
        } else {
            0
        };

        info!(
            "reading file: {} ({:.1} KB)",
            entry.name,
            entry.size as f64 / 1024.0
        );
        let Decoded { mut rows, schema } =
            match fetch_decoded(store, &entry.name, format, budget, columns, options) {
                Ok(decoded) => decoded,
                Err(err) => {
                    warn!("error reading file {}: {err}", entry.name);
                    continue;
                }
            };
        if rows.is_empty() {
            continue;
        }
        total_rows += rows.len() as u64;

        if remaining_offset > 0 {
            if remaining_offset >= rows.len() {
                // The offset swallows this file whole; its schema still
                // participates in the merge.
                remaining_offset -= rows.len();
                rows_skipped += rows.len();
                merged.merge(&schema);
                continue;
            }
            rows.drain(..remaining_offset);
            rows_skipped += remaining_offset;
            remaining_offset = 0;
        }

        merged.merge(&schema);
        accumulated.extend(rows);
    }

    if accumulated.is_empty() {
        if rows_skipped > 0 {
            warn!("offset ({offset}) skipped all available rows");
            return Ok((ResultTable::new(Vec::new(), merged), total_rows));
        }
        return Err(PeekError::NoDataRead);
    }

    if limit > 0 && accumulated.len() > limit {
        accumulated.truncate(limit);
    }
    Ok((ResultTable::new(accumulated, merged), total_rows))
}

/// Count the total records in one object.
///
/// Parquet and ORC answer from file metadata; every other format decodes
/// the whole object with an unbounded budget and counts rows.
pub fn count_records(
    store: &dyn ObjectStore,
    key: &str,
    format: Format,
    options: &FormatOptions,
) -> Result<u64> {
    let mut data = store.fetch(key)?;
    if let Some(kind) = compression::detect(key) {
        data = compression::decompress(&data, kind)?;
    }
    match format {
        #[cfg(feature = "io-parquet")]
        Format::Parquet => parquet::count(&data),
        #[cfg(feature = "io-orc")]
        Format::Orc => orc::count(&data),
        _ => {
            info!("counting records (this might take a while for large files)");
            let decoded = decode(format, &data, 0, None, options)?;
            Ok(decoded.rows.len() as u64)
        }
    }
}

/// Narrow rows to the requested columns.
///
/// Unknown columns are dropped from the projection with a warning. An empty
/// projection is an error — silently returning everything would make the
/// mistake invisible.
pub(crate) fn project_rows(
    rows: &mut Vec<Row>,
    schema: &Schema,
    columns: Option<&[String]>,
) -> Result<()> {
    let Some(requested) = columns else {
        return Ok(());
    };
    if requested.is_empty() {
        return Ok(());
    }

    let valid: Vec<&String> = requested
        .iter()
        .filter(|name| schema.get(name).is_some())
        .collect();
    if valid.len() != requested.len() {
        let missing: Vec<&str> = requested
            .iter()
            .filter(|name| schema.get(name).is_none())
            .map(String::as_str)
            .collect();
        warn!("columns not found: {}", missing.join(", "));
    }
    if valid.is_empty() {
        return Err(PeekError::NoMatchingColumns {
            available: schema.names().map(str::to_string).collect(),
        });
    }

    for row in rows.iter_mut() {
        row.retain(|name, _| valid.iter().any(|keep| *keep == name));
    }
    Ok(())
}
