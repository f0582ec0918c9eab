//! File selection for directory-style prefixes.
//!
//! Given a raw listing, this module applies the same hygiene steps for every
//! selection shape: drop empty files, skip well-known metadata artifacts,
//! optionally keep only one format's extensions, and sort by name. Sorting
//! by name is the sole determinism guarantee; listing order and mtimes are
//! never consulted.
//!
//! Over-filtering never empties the candidate set: when the metadata skip or
//! the format filter would remove everything, the engine falls back to the
//! pre-filter set and logs a warning instead. Only a genuinely empty or
//! all-zero-size listing is fatal.

use crate::error::{PeekError, Result};
use crate::format::Format;
use crate::storage::FileEntry;
use clap::ValueEnum;
use log::warn;
use regex::RegexSet;
use std::sync::LazyLock;

/// Storage artifacts that carry no user data: Spark/Hadoop success markers,
/// checksums, commit markers, and footer metadata files.
static SKIP_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"_SUCCESS$",
        r"\.crc$",
        r"\.committed$",
        r"\.pending$",
        r"_metadata$",
    ])
    .expect("metadata skip patterns are valid")
});

/// How a directory path turns into one or more files to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MultiFileMode {
    /// Always read a single file, the first suitable one.
    First,
    /// Read multiple files up to the byte budget; behaves like `First`
    /// when the budget is zero.
    Auto,
    /// Read multiple files up to the byte budget.
    All,
}

/// Selection input, built once from the CLI and consumed by [`select_files`].
#[derive(Debug, Clone)]
pub struct SelectionCriteria {
    pub format: Option<Format>,
    pub max_total_bytes: Option<u64>,
    pub mode: MultiFileMode,
}

impl SelectionCriteria {
    fn single_file(&self) -> bool {
        match self.mode {
            MultiFileMode::First => true,
            MultiFileMode::Auto => self.max_total_bytes.unwrap_or(0) == 0,
            MultiFileMode::All => false,
        }
    }
}

pub fn is_metadata_file(name: &str) -> bool {
    SKIP_PATTERNS.is_match(name)
}

/// Shared hygiene steps: emptiness checks, metadata skip, format filter,
/// and the deterministic sort.
fn candidates(
    entries: &[FileEntry],
    prefix: &str,
    format: Option<Format>,
) -> Result<Vec<FileEntry>> {
    if entries.is_empty() {
        return Err(PeekError::EmptyDirectory {
            prefix: prefix.to_string(),
        });
    }

    let non_empty: Vec<FileEntry> = entries.iter().filter(|e| e.size > 0).cloned().collect();
    if non_empty.is_empty() {
        return Err(PeekError::NoNonEmptyFiles {
            prefix: prefix.to_string(),
        });
    }

    let mut filtered: Vec<FileEntry> = non_empty
        .iter()
        .filter(|e| !is_metadata_file(&e.name))
        .cloned()
        .collect();
    if filtered.is_empty() {
        warn!("only found metadata files, using all non-empty files");
        filtered = non_empty;
    }

    if let Some(format) = format {
        let matching: Vec<FileEntry> = filtered
            .iter()
            .filter(|e| format.matches(&e.name))
            .cloned()
            .collect();
        if matching.is_empty() {
            warn!("no files matching format '{format}' found, using all available files");
        } else {
            filtered = matching;
        }
    }

    filtered.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(filtered)
}

/// Pick the first suitable file under a prefix.
pub fn find_first(
    entries: &[FileEntry],
    prefix: &str,
    format: Option<Format>,
) -> Result<FileEntry> {
    let sorted = candidates(entries, prefix, format)?;
    // candidates() already preferred non-metadata entries and fell back (with
    // a warning) when only metadata-like files exist, so the head is it.
    Ok(sorted.into_iter().next().expect("candidates are non-empty"))
}

/// Accumulate sorted files until the running size total reaches the budget.
///
/// The threshold is checked after adding each entry, so at least one file is
/// always selected and the total may overshoot by up to the last file's
/// size. This is a stopping threshold, not a hard byte ceiling.
pub fn select_for_budget(
    entries: &[FileEntry],
    prefix: &str,
    format: Option<Format>,
    max_total_bytes: u64,
) -> Result<Vec<FileEntry>> {
    let sorted = candidates(entries, prefix, format)?;

    let mut selected = Vec::new();
    let mut total: u64 = 0;
    for entry in sorted {
        total += entry.size;
        selected.push(entry);
        if total >= max_total_bytes {
            break;
        }
    }

    if selected.is_empty() {
        return Err(PeekError::NoSuitableFiles {
            prefix: prefix.to_string(),
        });
    }
    Ok(selected)
}

/// Apply the criteria to a raw listing, yielding the ordered files to read.
pub fn select_files(
    entries: &[FileEntry],
    prefix: &str,
    criteria: &SelectionCriteria,
) -> Result<Vec<FileEntry>> {
    if criteria.single_file() {
        Ok(vec![find_first(entries, prefix, criteria.format)?])
    } else {
        select_for_budget(
            entries,
            prefix,
            criteria.format,
            criteria.max_total_bytes.unwrap_or(0),
        )
    }
}
