//! JSON decoder: JSON Lines, a top-level array of objects, or one object.
//!
//! Shape detection sniffs the first character and the first few lines. When
//! a document that looks like a regular JSON value fails to parse, decoding
//! falls back to JSON Lines before giving up.

use crate::error::{PeekError, Result};
use crate::read::{Decoded, project_rows};
use crate::table::{Row, Schema};
use serde_json::Value;

pub fn decode(data: &[u8], budget: usize, columns: Option<&[String]>) -> Result<Decoded> {
    let text = std::str::from_utf8(data)
        .map_err(|e| decode_err(format!("input is not valid UTF-8: {e}")))?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Decoded::default());
    }

    let mut rows = if looks_like_json_lines(trimmed) {
        parse_json_lines(trimmed, budget)?
    } else if trimmed.starts_with('[') {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(items)) => {
                let mut rows = Vec::new();
                for (index, item) in items.into_iter().enumerate() {
                    if budget > 0 && rows.len() >= budget {
                        break;
                    }
                    match item {
                        Value::Object(object) => rows.push(object),
                        _ => {
                            return Err(decode_err(format!(
                                "array element {index} is not an object"
                            )));
                        }
                    }
                }
                rows
            }
            Ok(_) => return Err(decode_err("top-level value is not an array or object".into())),
            Err(_) => parse_json_lines(trimmed, budget)?,
        }
    } else if trimmed.starts_with('{') {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(object)) => vec![object],
            _ => parse_json_lines(trimmed, budget)?,
        }
    } else {
        return Err(decode_err(
            "input is neither a JSON document nor JSON Lines".into(),
        ));
    };

    let schema = Schema::infer(&rows);
    project_rows(&mut rows, &schema, columns)?;
    Ok(Decoded { rows, schema })
}

/// More than one non-blank line, each of the first few starting with `{`.
fn looks_like_json_lines(text: &str) -> bool {
    if !text.starts_with('{') {
        return false;
    }
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    lines.len() > 1 && lines.iter().take(5).all(|line| line.starts_with('{'))
}

fn parse_json_lines(text: &str, budget: usize) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if budget > 0 && rows.len() >= budget {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .map_err(|e| decode_err(format!("line {}: {e}", number + 1)))?;
        match value {
            Value::Object(object) => rows.push(object),
            _ => {
                return Err(decode_err(format!(
                    "line {} is not a JSON object",
                    number + 1
                )));
            }
        }
    }
    Ok(rows)
}

fn decode_err(message: String) -> PeekError {
    PeekError::Decode {
        format: "json",
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TypeTag;

    #[test]
    fn decodes_json_lines() {
        let data = b"{\"id\":1,\"name\":\"a\"}\n{\"id\":2,\"name\":\"b\"}\n";
        let decoded = decode(data, 0, None).unwrap();
        assert_eq!(decoded.rows.len(), 2);
        assert_eq!(decoded.schema.get("id"), Some(TypeTag::Int));
    }

    #[test]
    fn decodes_array() {
        let data = br#"[{"id": 1}, {"id": 2}, {"id": 3}]"#;
        let decoded = decode(data, 2, None).unwrap();
        assert_eq!(decoded.rows.len(), 2, "budget applies to arrays too");
    }

    #[test]
    fn decodes_single_object_as_one_row() {
        let decoded = decode(br#"{"id": 1, "name": "only"}"#, 0, None).unwrap();
        assert_eq!(decoded.rows.len(), 1);
    }

    #[test]
    fn empty_input_is_empty_not_an_error() {
        let decoded = decode(b"  \n ", 0, None).unwrap();
        assert!(decoded.rows.is_empty());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = decode(b"[1, 2,", 0, None).unwrap_err();
        assert!(matches!(err, PeekError::Decode { format: "json", .. }));
    }

    #[test]
    fn array_of_scalars_is_rejected() {
        assert!(decode(b"[1, 2, 3]", 0, None).is_err());
    }

    #[test]
    fn budget_stops_json_lines_early() {
        let data = b"{\"n\":1}\n{\"n\":2}\n{\"n\":3}\nnot json at all\n";
        let decoded = decode(data, 2, None).unwrap();
        assert_eq!(decoded.rows.len(), 2, "stops before the bad line");
    }
}
