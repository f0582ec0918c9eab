//! Parquet decoder.
//!
//! Parquet needs random access to its footer, so the fetched object is
//! handed to the reader as an in-memory `Bytes` buffer. Record batches are
//! pulled until the row budget is met, which skips trailing row groups
//! entirely for small previews of large files.

use crate::error::{PeekError, Result};
use crate::read::batches::{rows_from_batch, schema_from_arrow};
use crate::read::{Decoded, project_rows};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

const BATCH_SIZE: usize = 8192;

pub fn decode(data: &[u8], budget: usize, columns: Option<&[String]>) -> Result<Decoded> {
    if data.is_empty() {
        return Ok(Decoded::default());
    }
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::copy_from_slice(data))
        .map_err(decode_err)?;
    let schema = schema_from_arrow(builder.schema());
    let reader = builder
        .with_batch_size(BATCH_SIZE)
        .build()
        .map_err(decode_err)?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.map_err(decode_err)?;
        rows.extend(rows_from_batch(&batch, "parquet")?);
        if budget > 0 && rows.len() >= budget {
            rows.truncate(budget);
            break;
        }
    }

    project_rows(&mut rows, &schema, columns)?;
    Ok(Decoded { rows, schema })
}

/// Row count straight from the footer metadata; no row is decoded.
pub fn count(data: &[u8]) -> Result<u64> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::copy_from_slice(data))
        .map_err(decode_err)?;
    Ok(builder.metadata().file_metadata().num_rows().max(0) as u64)
}

fn decode_err(err: impl std::fmt::Display) -> PeekError {
    PeekError::Decode {
        format: "parquet",
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TypeTag;
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::arrow_writer::ArrowWriter;
    use std::sync::Arc;

    fn sample_parquet(rows: i64) -> Vec<u8> {
        let ids: ArrayRef = Arc::new(Int64Array::from_iter_values(0..rows));
        let names: ArrayRef = Arc::new(StringArray::from_iter_values(
            (0..rows).map(|i| format!("row-{i}")),
        ));
        let batch =
            RecordBatch::try_from_iter(vec![("id", ids), ("name", names)]).unwrap();
        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        buffer
    }

    #[test]
    fn decodes_rows_and_schema() {
        let data = sample_parquet(4);
        let decoded = decode(&data, 0, None).unwrap();
        assert_eq!(decoded.rows.len(), 4);
        assert_eq!(decoded.schema.get("id"), Some(TypeTag::Int));
        assert_eq!(decoded.schema.get("name"), Some(TypeTag::Str));
        assert_eq!(decoded.rows[1]["name"], serde_json::json!("row-1"));
    }

    #[test]
    fn budget_truncates() {
        let data = sample_parquet(10);
        let decoded = decode(&data, 3, None).unwrap();
        assert_eq!(decoded.rows.len(), 3);
    }

    #[test]
    fn count_uses_metadata() {
        let data = sample_parquet(25);
        assert_eq!(count(&data).unwrap(), 25);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let decoded = decode(b"", 0, None).unwrap();
        assert!(decoded.rows.is_empty());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode(b"not parquet at all", 0, None).unwrap_err();
        assert!(matches!(err, PeekError::Decode { format: "parquet", .. }));
    }
}
