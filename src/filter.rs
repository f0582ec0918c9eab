//! Row filtering with a small WHERE-clause grammar.
//!
//! The grammar is deliberately narrow: one column, one operator, one value.
//! Parsing is a fixed ordered rule set, not an expression grammar. Textual
//! operators are tried first (so a value containing `=` still parses), then
//! the comparison operators with the two-character forms before `=`, `<`,
//! and `>` so `>=` never misparses as `>`.

use crate::error::{PeekError, Result};
use crate::table::{ResultTable, TypeTag};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub column: String,
    pub op: WhereOp,
    pub value: String,
}

/// Multi-word operators, with `not contains` before `contains` so the
/// longer keyword wins. Matched case-insensitively, spaces required.
const WORD_OPS: &[(&str, WhereOp)] = &[
    (" not contains ", WhereOp::NotContains),
    (" contains ", WhereOp::Contains),
    (" startswith ", WhereOp::StartsWith),
    (" endswith ", WhereOp::EndsWith),
];

/// Comparison operators in trial order. Two-character forms come first.
const COMPARE_OPS: &[(&str, WhereOp)] = &[
    ("!=", WhereOp::Ne),
    ("<=", WhereOp::Le),
    (">=", WhereOp::Ge),
    ("=", WhereOp::Eq),
    ("<", WhereOp::Lt),
    (">", WhereOp::Gt),
];

/// Parse a raw WHERE clause like `age>=30` or `name contains john`.
pub fn parse_where_clause(raw: &str) -> Result<WhereClause> {
    // ASCII lowering keeps byte offsets aligned with the original clause.
    let lower = raw.to_ascii_lowercase();

    for (keyword, op) in WORD_OPS {
        if let Some(at) = lower.find(keyword) {
            let column = raw[..at].trim();
            let value = strip_quotes(raw[at + keyword.len()..].trim());
            if !column.is_empty() {
                return Ok(WhereClause {
                    column: column.to_string(),
                    op: *op,
                    value: value.to_string(),
                });
            }
        }
    }

    for (symbol, op) in COMPARE_OPS {
        if let Some(at) = raw.find(symbol) {
            let column = raw[..at].trim();
            let value = strip_quotes(raw[at + symbol.len()..].trim());
            if column.is_empty() {
                break;
            }
            return Ok(WhereClause {
                column: column.to_string(),
                op: *op,
                value: value.to_string(),
            });
        }
    }

    Err(PeekError::InvalidWhereClause {
        clause: raw.to_string(),
    })
}

/// Drop one pair of matching surrounding quotes, if present.
fn strip_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Apply a parsed clause, returning the surviving rows with the same schema.
///
/// The operand is coerced by the column's observed type: numeric columns
/// parse it as int (or float when it contains `.`), boolean columns map
/// `true`/`1`/`yes` to true. Textual operators stringify the cell and match
/// case-insensitively; null or missing cells never match and never error.
pub fn apply_where_filter(table: ResultTable, clause: &WhereClause) -> Result<ResultTable> {
    let column_type = table
        .schema
        .get(&clause.column)
        .ok_or_else(|| PeekError::UnknownColumn {
            column: clause.column.clone(),
        })?;
    let operand = coerce(&clause.value, column_type);

    let ResultTable { rows, schema } = table;
    let rows = rows
        .into_iter()
        .filter(|row| {
            let cell = row.get(&clause.column).unwrap_or(&Value::Null);
            matches(cell, clause.op, &operand, &clause.value)
        })
        .collect();
    Ok(ResultTable { rows, schema })
}

fn coerce(raw: &str, column_type: TypeTag) -> Value {
    match column_type {
        TypeTag::Int | TypeTag::Float => {
            if raw.contains('.') {
                raw.parse::<f64>()
                    .ok()
                    .and_then(|f| serde_json::Number::from_f64(f).map(Value::Number))
                    .unwrap_or_else(|| Value::String(raw.to_string()))
            } else {
                raw.parse::<i64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(raw.to_string()))
            }
        }
        TypeTag::Bool => {
            let lowered = raw.to_ascii_lowercase();
            Value::Bool(matches!(lowered.as_str(), "true" | "1" | "yes"))
        }
        _ => Value::String(raw.to_string()),
    }
}

fn matches(cell: &Value, op: WhereOp, operand: &Value, raw_operand: &str) -> bool {
    match op {
        WhereOp::Contains | WhereOp::NotContains | WhereOp::StartsWith | WhereOp::EndsWith => {
            // Null and missing cells never match textual operators.
            if cell.is_null() {
                return false;
            }
            let haystack = stringify(cell).to_lowercase();
            let needle = raw_operand.to_lowercase();
            match op {
                WhereOp::Contains => haystack.contains(&needle),
                WhereOp::NotContains => !haystack.contains(&needle),
                WhereOp::StartsWith => haystack.starts_with(&needle),
                WhereOp::EndsWith => haystack.ends_with(&needle),
                _ => unreachable!(),
            }
        }
        WhereOp::Eq | WhereOp::Ne | WhereOp::Lt | WhereOp::Le | WhereOp::Gt | WhereOp::Ge => {
            let Some(ordering) = compare(cell, operand) else {
                return false;
            };
            match op {
                WhereOp::Eq => ordering.is_eq(),
                WhereOp::Ne => ordering.is_ne(),
                WhereOp::Lt => ordering.is_lt(),
                WhereOp::Le => ordering.is_le(),
                WhereOp::Gt => ordering.is_gt(),
                WhereOp::Ge => ordering.is_ge(),
                _ => unreachable!(),
            }
        }
    }
}

/// Standard ordering between a cell and the coerced operand, or `None` when
/// the two are not comparable (null cells, mismatched types).
fn compare(cell: &Value, operand: &Value) -> Option<std::cmp::Ordering> {
    match (cell, operand) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
