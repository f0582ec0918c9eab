//! Terminal output: table, JSON, pretty JSON, and CSV renderings.

use crate::error::{PeekError, Result};
use crate::table::{ResultTable, Schema};
use clap::ValueEnum;
use colored::Colorize;
use regex::Regex;
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table with a colored header.
    Table,
    /// One compact JSON object per line.
    Json,
    /// Pretty-printed, colorized JSON array.
    Jsonp,
    /// CSV with a header row.
    Csv,
}

const MAX_CELL_WIDTH: usize = 80;

/// Render the assembled table in the requested output format.
pub fn render(table: &ResultTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(table)),
        OutputFormat::Json => Ok(render_json_lines(table)),
        OutputFormat::Jsonp => render_json_pretty(table),
        OutputFormat::Csv => render_csv(table),
    }
}

fn render_table(table: &ResultTable) -> String {
    let columns = table.display_columns();
    if columns.is_empty() {
        return "(no columns)".to_string();
    }

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|name| clip(&display_value(row.get(name))))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(widths.iter().copied())
        .map(|(name, width)| format!("{name:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", header.join("  ").cyan().bold());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  "));
    }
    if table.rows.is_empty() {
        let _ = writeln!(out, "(no rows)");
    }
    out.truncate(out.trim_end().len());
    out
}

fn render_json_lines(table: &ResultTable) -> String {
    table
        .rows
        .iter()
        .map(|row| serde_json::to_string(row).unwrap_or_else(|_| "{}".to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

static JSON_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"\n]+)":"#).expect("key pattern is valid"));

fn render_json_pretty(table: &ResultTable) -> Result<String> {
    let rows: Vec<&serde_json::Map<String, Value>> = table.rows.iter().collect();
    let pretty = serde_json::to_string_pretty(&rows).map_err(|e| PeekError::Decode {
        format: "json",
        message: e.to_string(),
    })?;
    // Colorize keys line by line, the way a pager would.
    Ok(JSON_KEY
        .replace_all(&pretty, |caps: &regex::Captures<'_>| {
            format!("{}:", format!("\"{}\"", &caps[1]).cyan())
        })
        .into_owned())
}

fn render_csv(table: &ResultTable) -> Result<String> {
    let columns = table.display_columns();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&columns)
        .map_err(csv_err)?;
    for row in &table.rows {
        let record: Vec<String> = columns
            .iter()
            .map(|name| display_value(row.get(name)))
            .collect();
        writer.write_record(&record).map_err(csv_err)?;
    }
    let bytes = writer.into_inner().map_err(|e| PeekError::Decode {
        format: "csv",
        message: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
}

fn csv_err(err: csv::Error) -> PeekError {
    PeekError::Decode {
        format: "csv",
        message: err.to_string(),
    }
}

/// Schema block: one `column: type` line per column.
pub fn render_schema(schema: &Schema) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Schema:".green());
    for (name, tag) in schema.iter() {
        let _ = writeln!(out, "  {name}: {}", tag.name());
    }
    out.truncate(out.trim_end().len());
    out
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    format!("{clipped}…")
}
