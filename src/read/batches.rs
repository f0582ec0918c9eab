//! Arrow record-batch to row conversion, shared by the Parquet and ORC
//! decoders.

use crate::error::{PeekError, Result};
use crate::table::{Row, Schema, TypeTag};
use arrow::datatypes::{DataType, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;

/// Map an Arrow schema onto the coarse preview schema.
pub(crate) fn schema_from_arrow(schema: &ArrowSchema) -> Schema {
    Schema::from_columns(
        schema
            .fields()
            .iter()
            .map(|field| (field.name().clone(), tag_for(field.data_type())))
            .collect(),
    )
}

fn tag_for(data_type: &DataType) -> TypeTag {
    match data_type {
        DataType::Boolean => TypeTag::Bool,
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => TypeTag::Int,
        DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => TypeTag::Float,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => TypeTag::Str,
        // Temporal and binary columns render as strings in the preview.
        DataType::Date32
        | DataType::Date64
        | DataType::Time32(_)
        | DataType::Time64(_)
        | DataType::Timestamp(_, _)
        | DataType::Duration(_)
        | DataType::Interval(_)
        | DataType::Binary
        | DataType::LargeBinary
        | DataType::BinaryView
        | DataType::FixedSizeBinary(_) => TypeTag::Str,
        DataType::Null => TypeTag::Null,
        _ => TypeTag::Mixed,
    }
}

/// Flatten a record batch into rows by way of Arrow's JSON writer. Null
/// cells are omitted from their rows, which the row model treats the same
/// as an explicit null.
pub(crate) fn rows_from_batch(batch: &RecordBatch, format: &'static str) -> Result<Vec<Row>> {
    let mut buffer = Vec::new();
    {
        let mut writer = arrow::json::LineDelimitedWriter::new(&mut buffer);
        writer
            .write(batch)
            .map_err(|e| convert_err(format, e))?;
        writer.finish().map_err(|e| convert_err(format, e))?;
    }

    let mut rows = Vec::with_capacity(batch.num_rows());
    for line in buffer.split(|byte| *byte == b'\n') {
        if line.is_empty() {
            continue;
        }
        let row: Row =
            serde_json::from_slice(line).map_err(|e| convert_err(format, e))?;
        rows.push(row);
    }
    Ok(rows)
}

fn convert_err(format: &'static str, err: impl std::fmt::Display) -> PeekError {
    PeekError::Decode {
        format,
        message: err.to_string(),
    }
}
