//! ORC decoder.
//!
//! The ORC reader needs positioned reads, so the fetched object is spilled
//! to an anonymous temporary file. Anonymous temp files are unlinked by the
//! OS when the handle drops, so cleanup holds on every exit path.

use crate::error::{PeekError, Result};
use crate::read::batches::{rows_from_batch, schema_from_arrow};
use crate::read::{Decoded, project_rows};
use orc_rust::arrow_reader::ArrowReaderBuilder;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

const BATCH_SIZE: usize = 8192;

pub fn decode(data: &[u8], budget: usize, columns: Option<&[String]>) -> Result<Decoded> {
    if data.is_empty() {
        return Ok(Decoded::default());
    }
    let file = spill_to_temp(data)?;
    let builder = ArrowReaderBuilder::try_new(file).map_err(decode_err)?;
    let schema = schema_from_arrow(&builder.schema());
    let reader = builder.with_batch_size(BATCH_SIZE).build();

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.map_err(decode_err)?;
        rows.extend(rows_from_batch(&batch, "orc")?);
        if budget > 0 && rows.len() >= budget {
            rows.truncate(budget);
            break;
        }
    }

    project_rows(&mut rows, &schema, columns)?;
    Ok(Decoded { rows, schema })
}

/// Row count from file metadata; no row is decoded.
pub fn count(data: &[u8]) -> Result<u64> {
    let file = spill_to_temp(data)?;
    let builder = ArrowReaderBuilder::try_new(file).map_err(decode_err)?;
    Ok(builder.file_metadata().number_of_rows())
}

fn spill_to_temp(data: &[u8]) -> Result<File> {
    let mut file = tempfile::tempfile().map_err(|e| spill_err(e))?;
    file.write_all(data).map_err(spill_err)?;
    file.seek(SeekFrom::Start(0)).map_err(spill_err)?;
    Ok(file)
}

fn spill_err(err: std::io::Error) -> PeekError {
    PeekError::Decode {
        format: "orc",
        message: format!("failed to spill to temporary file: {err}"),
    }
}

fn decode_err(err: impl std::fmt::Display) -> PeekError {
    PeekError::Decode {
        format: "orc",
        message: err.to_string(),
    }
}
