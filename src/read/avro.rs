//! Avro decoder.

use crate::error::{PeekError, Result};
use crate::read::{Decoded, project_rows};
use crate::table::Schema;
use apache_avro::Reader;
use serde_json::Value;

pub fn decode(data: &[u8], budget: usize, columns: Option<&[String]>) -> Result<Decoded> {
    if data.is_empty() {
        return Ok(Decoded::default());
    }
    let reader = Reader::new(data).map_err(decode_err)?;

    let mut rows = Vec::new();
    for record in reader {
        if budget > 0 && rows.len() >= budget {
            break;
        }
        let record = record.map_err(decode_err)?;
        let value: Value = record.try_into().map_err(decode_err)?;
        match value {
            Value::Object(object) => rows.push(object),
            _ => {
                return Err(PeekError::Decode {
                    format: "avro",
                    message: "record is not an object".to_string(),
                });
            }
        }
    }

    let schema = Schema::infer(&rows);
    project_rows(&mut rows, &schema, columns)?;
    Ok(Decoded { rows, schema })
}

fn decode_err(err: impl std::fmt::Display) -> PeekError {
    PeekError::Decode {
        format: "avro",
        message: err.to_string(),
    }
}
