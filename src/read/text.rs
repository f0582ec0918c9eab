//! Plain text decoder: one row per line.

use crate::error::Result;
use crate::read::{Decoded, project_rows};
use crate::table::{Row, Schema, TypeTag};
use serde_json::Value;

pub fn decode(data: &[u8], budget: usize, columns: Option<&[String]>) -> Result<Decoded> {
    let text = String::from_utf8_lossy(data);
    let mut rows: Vec<Row> = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if budget > 0 && rows.len() >= budget {
            break;
        }
        let mut row = Row::new();
        row.insert("line".to_string(), Value::String(line.to_string()));
        row.insert("line_number".to_string(), Value::from((number + 1) as i64));
        rows.push(row);
    }

    let schema = Schema::from_columns(vec![
        ("line".to_string(), TypeTag::Str),
        ("line_number".to_string(), TypeTag::Int),
    ]);
    project_rows(&mut rows, &schema, columns)?;
    Ok(Decoded { rows, schema })
}
