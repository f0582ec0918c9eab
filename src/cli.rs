//! Command-line surface and run orchestration.
//!
//! `run` wires the whole pipeline together: parse the path, list or fetch,
//! select files, read with offset/limit bounds, filter, render, count.

use crate::config::CloudOptions;
use crate::filter::{apply_where_filter, parse_where_clause};
use crate::format::Format;
use crate::read::{self, FormatOptions};
use crate::render::{self, OutputFormat};
use crate::select::{MultiFileMode, SelectionCriteria, find_first, select_files};
use crate::storage;
use crate::table::ResultTable;
use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaMode {
    /// Print the schema before the data.
    Show,
    /// Data only.
    DontShow,
    /// Schema (and count) only, no data.
    SchemaOnly,
}

/// Display data from files in Google Cloud Storage, AWS S3, or Azure Blob
/// Storage.
///
/// Supported formats: CSV, JSON, Parquet, Avro, ORC, and plain text.
/// Compressed files (.gz, .zst, .lz4, .snappy, .bz2) are detected from the
/// file name and decompressed automatically.
#[derive(Parser, Debug)]
#[command(
    name = "cloudpeek",
    version,
    after_help = "Examples:\n  \
      cloudpeek -p gs://my-bucket/data.csv\n  \
      cloudpeek -p s3://my-bucket/data.parquet -c id,name,value\n  \
      cloudpeek -p az://my-container/data.json -o jsonp\n  \
      cloudpeek -p gs://my-bucket/sparkoutput/ -i parquet\n  \
      cloudpeek -p s3://my-bucket/daily-data/ -m all --max-size-mb 25\n  \
      cloudpeek -p gs://my-bucket/data.csv --offset 100 -n 10\n  \
      cloudpeek -p s3://bucket/users.parquet -w \"status=active\"\n  \
      cloudpeek -p gs://bucket/logs.csv -w \"message contains error\"\n  \
      cloudpeek -p gs://my-bucket/data.csv.gz -d \"\\t\""
)]
pub struct Cli {
    /// Path to the file or directory (gs://, s3://, or az://). A trailing
    /// slash means a directory.
    #[arg(short, long)]
    pub path: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,

    /// Input format (default: inferred from the path).
    #[arg(short, long, value_enum)]
    pub input_format: Option<Format>,

    /// Comma-separated list of columns to display (default: all).
    #[arg(short, long)]
    pub columns: Option<String>,

    /// Number of rows to display (0 = all).
    #[arg(short = 'n', long, default_value_t = 10)]
    pub num_rows: usize,

    /// Skip the first N rows.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Filter rows (e.g. "status=active", "age>30", "name contains john").
    #[arg(short = 'w', long = "where")]
    pub where_clause: Option<String>,

    /// Schema display mode.
    #[arg(short, long, value_enum, default_value_t = SchemaMode::Show)]
    pub schema: SchemaMode,

    /// Disable the total record count.
    #[arg(long)]
    pub no_count: bool,

    /// How to handle directories with multiple files.
    #[arg(short, long, value_enum, default_value_t = MultiFileMode::Auto)]
    pub multi_file_mode: MultiFileMode,

    /// Maximum size in MB to read in multi-file mode.
    #[arg(long, default_value_t = 25)]
    pub max_size_mb: u64,

    /// Delimiter for CSV files (use "\t" for tab).
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// AWS profile name (for S3 access).
    #[arg(long)]
    pub profile: Option<String>,

    /// GCP project id (for GCS access).
    #[arg(long)]
    pub project: Option<String>,

    /// Path to a GCP service account JSON file.
    #[arg(long)]
    pub credentials: Option<String>,

    /// Azure storage account name.
    #[arg(long)]
    pub account: Option<String>,
}

pub fn run(cli: Cli) -> Result<()> {
    if let Some(profile) = &cli.profile {
        // Single-threaded startup; exported before any backend or runtime
        // thread exists.
        unsafe { std::env::set_var("AWS_PROFILE", profile) };
    }

    let options = FormatOptions {
        delimiter: parse_delimiter(cli.delimiter.as_deref())?,
    };
    let cloud = CloudOptions {
        aws_profile: cli.profile.clone(),
        gcp_project: cli.project.clone(),
        gcp_credentials: cli.credentials.clone(),
        azure_account: cli.account.clone(),
    };
    let columns: Option<Vec<String>> = cli.columns.as_deref().map(|spec| {
        spec.split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    });

    let path = storage::parse_cloud_path(&cli.path)?;
    let store = storage::connect(&path, &cloud)?;
    let (offset, limit) = (cli.offset, cli.num_rows);

    // The single object to count later, when the read itself did not
    // already produce a total.
    let mut count_target: Option<(String, Format)> = None;
    let mut total_count: Option<u64> = None;

    let table = if path.is_directory() {
        info!("path is a directory");
        let entries = store.list(&path.key)?;
        let single_file = cli.multi_file_mode == MultiFileMode::First
            || (cli.multi_file_mode == MultiFileMode::Auto && cli.max_size_mb == 0);

        if single_file {
            info!("looking for first suitable file");
            let entry = find_first(&entries, &path.key, cli.input_format)?;
            info!("selected file: {} ({} bytes)", entry.name, entry.size);
            let format = resolve_format(cli.input_format, &entry.name)?;
            let table = read::read_single_file(
                store.as_ref(),
                &entry.name,
                format,
                offset,
                limit,
                columns.as_deref(),
                &options,
            )?;
            count_target = Some((entry.name, format));
            table
        } else {
            info!("reading multiple files (up to {} MB)", cli.max_size_mb);
            let format = match cli.input_format {
                Some(format) => format,
                None => {
                    let first = find_first(&entries, &path.key, None)?;
                    let format = Format::from_path(&first.name)?;
                    info!("inferred input format from first file: {format}");
                    format
                }
            };
            let criteria = SelectionCriteria {
                format: Some(format),
                max_total_bytes: Some(cli.max_size_mb * 1024 * 1024),
                mode: cli.multi_file_mode,
            };
            let files = select_files(&entries, &path.key, &criteria)?;
            let total_bytes: u64 = files.iter().map(|f| f.size).sum();
            info!(
                "reading {} files totaling {:.2} MB",
                files.len(),
                total_bytes as f64 / (1024.0 * 1024.0)
            );
            let (table, total_rows) = read::read_multi_file(
                store.as_ref(),
                &files,
                format,
                offset,
                limit,
                columns.as_deref(),
                &options,
            )?;
            total_count = Some(total_rows);
            table
        }
    } else {
        let format = resolve_format(cli.input_format, &path.key)?;
        let table = read::read_single_file(
            store.as_ref(),
            &path.key,
            format,
            offset,
            limit,
            columns.as_deref(),
            &options,
        )?;
        count_target = Some((path.key.clone(), format));
        table
    };

    let table: ResultTable = match &cli.where_clause {
        Some(raw) if !table.rows.is_empty() => {
            let clause = parse_where_clause(raw)?;
            let before = table.rows.len();
            let filtered = apply_where_filter(table, &clause)?;
            info!(
                "filtered: {} of {before} rows match '{raw}'",
                filtered.rows.len()
            );
            filtered
        }
        _ => table,
    };

    if matches!(cli.schema, SchemaMode::Show | SchemaMode::SchemaOnly) {
        println!("{}\n", render::render_schema(&table.schema));
    }

    if cli.schema != SchemaMode::SchemaOnly {
        println!("{}", render::render(&table, cli.output_format)?);
    }

    if !cli.no_count {
        if total_count.is_none()
            && let Some((key, format)) = &count_target
        {
            match read::count_records(store.as_ref(), key, *format, &options) {
                Ok(count) => total_count = Some(count),
                Err(err) => warn!("could not count records: {err}"),
            }
        }
        if let Some(count) = total_count {
            println!("\n{}", format!("Total records: {count}").cyan());
        }
    }

    Ok(())
}

fn resolve_format(explicit: Option<Format>, name: &str) -> crate::error::Result<Format> {
    match explicit {
        Some(format) => Ok(format),
        None => {
            let format = Format::from_path(name)?;
            info!("inferred input format: {format}");
            Ok(format)
        }
    }
}

/// A delimiter is one byte; the two-character sequence `\t` is accepted as
/// shell-friendly spelling for a tab.
fn parse_delimiter(spec: Option<&str>) -> Result<Option<u8>> {
    let Some(spec) = spec else { return Ok(None) };
    let resolved = if spec == "\\t" { "\t" } else { spec };
    match resolved.as_bytes() {
        [byte] => Ok(Some(*byte)),
        _ => bail!("delimiter must be a single character (got '{spec}')"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn delimiter_accepts_tab_spelling() {
        assert_eq!(parse_delimiter(Some("\\t")).unwrap(), Some(b'\t'));
        assert_eq!(parse_delimiter(Some(",")).unwrap(), Some(b','));
        assert_eq!(parse_delimiter(None).unwrap(), None);
        assert!(parse_delimiter(Some("ab")).is_err());
    }
}
