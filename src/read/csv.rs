//! CSV decoder.
//!
//! The first record is always treated as a header row. Field values are
//! sniffed into ints, floats, and bools where they parse cleanly; empty
//! fields become null.

use crate::error::{PeekError, Result};
use crate::read::{Decoded, FormatOptions, project_rows};
use crate::table::{Row, Schema, TypeTag};
use csv::ReaderBuilder;
use serde_json::Value;

pub fn decode(
    data: &[u8],
    budget: usize,
    columns: Option<&[String]>,
    options: &FormatOptions,
) -> Result<Decoded> {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    if let Some(delimiter) = options.delimiter {
        builder.delimiter(delimiter);
    }
    let mut reader = builder.from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| decode_err(format!("header row: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows: Vec<Row> = Vec::new();
    let mut tags: Vec<TypeTag> = vec![TypeTag::Null; headers.len()];
    for (index, record) in reader.records().enumerate() {
        if budget > 0 && rows.len() >= budget {
            break;
        }
        let record =
            record.map_err(|e| decode_err(format!("record #{}: {e}", index + 1)))?;
        let mut row = Row::new();
        for (i, field) in record.iter().enumerate() {
            let value = sniff_value(field);
            if i < headers.len() {
                tags[i] = tags[i].widen(TypeTag::of(&value));
                row.insert(headers[i].clone(), value);
            }
        }
        rows.push(row);
    }

    // Header columns stay in the schema even when no row was read.
    let schema = Schema::from_columns(
        headers.iter().cloned().zip(tags).collect(),
    );
    project_rows(&mut rows, &schema, columns)?;
    Ok(Decoded { rows, schema })
}

/// Parse a raw field into the narrowest value it cleanly represents.
fn sniff_value(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = field.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = field.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }
    if field.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(field.to_string())
}

fn decode_err(message: String) -> PeekError {
    PeekError::Decode {
        format: "csv",
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"id,name,score\n1,alice,9.5\n2,bob,8.0\n3,carol,7.25\n";

    #[test]
    fn decodes_rows_with_sniffed_types() {
        let decoded = decode(SAMPLE, 0, None, &FormatOptions::default()).unwrap();
        assert_eq!(decoded.rows.len(), 3);
        assert_eq!(decoded.schema.get("id"), Some(TypeTag::Int));
        assert_eq!(decoded.schema.get("name"), Some(TypeTag::Str));
        assert_eq!(decoded.schema.get("score"), Some(TypeTag::Float));
        assert_eq!(decoded.rows[0]["name"], Value::from("alice"));
    }

    #[test]
    fn budget_stops_early() {
        let decoded = decode(SAMPLE, 2, None, &FormatOptions::default()).unwrap();
        assert_eq!(decoded.rows.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let decoded = decode(b"", 0, None, &FormatOptions::default()).unwrap();
        assert!(decoded.rows.is_empty());
        assert!(decoded.schema.is_empty());
    }

    #[test]
    fn custom_delimiter() {
        let options = FormatOptions {
            delimiter: Some(b'\t'),
        };
        let decoded = decode(b"a\tb\n1\t2\n", 0, None, &options).unwrap();
        assert_eq!(decoded.rows[0]["b"], Value::from(2));
    }

    #[test]
    fn projection_narrows_rows_not_schema() {
        let cols = vec!["name".to_string()];
        let decoded = decode(SAMPLE, 0, Some(&cols), &FormatOptions::default()).unwrap();
        assert_eq!(decoded.rows[0].len(), 1);
        assert_eq!(decoded.schema.len(), 3, "schema stays full");
    }

    #[test]
    fn projection_with_no_valid_columns_fails() {
        let cols = vec!["nope".to_string()];
        let err = decode(SAMPLE, 0, Some(&cols), &FormatOptions::default()).unwrap_err();
        assert!(matches!(err, PeekError::NoMatchingColumns { .. }));
    }

    #[test]
    fn empty_fields_are_null() {
        let decoded = decode(b"a,b\n1,\n", 0, None, &FormatOptions::default()).unwrap();
        assert_eq!(decoded.rows[0]["b"], Value::Null);
    }
}
