//! Row and schema model shared by every decoder and the readers.
//!
//! Rows are JSON objects whose key order is the column order (`serde_json`
//! is built with `preserve_order`). A [`Schema`] is an ordered mapping of
//! column name to [`TypeTag`]; merging schemas across files keeps the
//! first-seen type and degrades any disagreement to [`TypeTag::Mixed`].

use serde_json::Value;

/// One record: column name to value, in column order.
pub type Row = serde_json::Map<String, Value>;

/// Coarse column type used for schema display, merging, and filter coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Mixed,
}

impl TypeTag {
    /// Tag for a single decoded value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Self::Int
                } else {
                    Self::Float
                }
            }
            Value::String(_) => Self::Str,
            Value::Array(_) | Value::Object(_) => Self::Mixed,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
            Self::Mixed => "mixed",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Widening used while inferring a schema within one file. Nulls carry
    /// no information, and ints widen to floats; anything else that
    /// disagrees is mixed.
    pub(crate) fn widen(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Null, b) => b,
            (a, Self::Null) => a,
            (Self::Int, Self::Float) | (Self::Float, Self::Int) => Self::Float,
            _ => Self::Mixed,
        }
    }
}

/// Ordered column-to-type mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<(String, TypeTag)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(columns: Vec<(String, TypeTag)>) -> Self {
        Self { columns }
    }

    /// Infer a schema from decoded rows, in first-seen column order.
    pub fn infer(rows: &[Row]) -> Self {
        let mut schema = Self::new();
        for row in rows {
            for (name, value) in row {
                let tag = TypeTag::of(value);
                match schema.columns.iter_mut().find(|(n, _)| n == name) {
                    Some((_, existing)) => *existing = existing.widen(tag),
                    None => schema.columns.push((name.clone(), tag)),
                }
            }
        }
        schema
    }

    pub fn get(&self, name: &str) -> Option<TypeTag> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, tag)| *tag)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeTag)> {
        self.columns.iter().map(|(n, t)| (n.as_str(), *t))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Fold another file's schema into this one.
    ///
    /// First-seen type wins when the types agree; any disagreement for the
    /// same column becomes [`TypeTag::Mixed`]. The operation is commutative
    /// and idempotent in the resulting type of every column.
    pub fn merge(&mut self, other: &Schema) {
        for (name, tag) in &other.columns {
            match self.columns.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => {
                    if *existing != *tag {
                        *existing = TypeTag::Mixed;
                    }
                }
                None => self.columns.push((name.clone(), *tag)),
            }
        }
    }
}

/// The assembled preview: rows plus the (merged) schema they belong to.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    pub rows: Vec<Row>,
    pub schema: Schema,
}

impl ResultTable {
    pub fn new(rows: Vec<Row>, schema: Schema) -> Self {
        Self { rows, schema }
    }

    /// Column order for display: first-seen order across rows, falling back
    /// to the schema when there are no rows. Projection narrows rows but
    /// never the schema, so display order must come from the rows.
    pub fn display_columns(&self) -> Vec<String> {
        if self.rows.is_empty() {
            return self.schema.names().map(str::to_string).collect();
        }
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for name in row.keys() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.clone());
                }
            }
        }
        columns
    }
}
