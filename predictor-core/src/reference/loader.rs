//! Reference table loaders
//!
//! The master-data files are headerless CSV. Rows that do not fit a table's
//! shape are skipped one by one: each skip is logged at `warn` and recorded
//! in the table's [`LoadReport`] so callers can inspect it.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use crate::error::DataError;

// ============================================================================
// DIAGNOSTICS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("expected at least {minimum} columns, found {found}")]
    TooFewColumns { minimum: usize, found: usize },

    #[error("invalid severity value `{0}`")]
    InvalidSeverity(String),

    #[error("empty key")]
    EmptyKey,
}

/// One row left out of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line in the source file
    pub line: u64,
    pub fields: Vec<String>,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.reason, self.fields)
    }
}

/// Outcome of loading one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub table: &'static str,
    pub loaded: usize,
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    fn new(table: &'static str) -> Self {
        Self {
            table,
            loaded: 0,
            skipped: Vec::new(),
        }
    }

    fn skip(&mut self, record: &StringRecord, reason: SkipReason) {
        let row = SkippedRow {
            line: record.position().map_or(0, |p| p.line()),
            fields: record.iter().map(str::to_string).collect(),
            reason,
        };
        log::warn!("{}: skipping malformed row, {}", self.table, row);
        self.skipped.push(row);
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn log_summary(&self) {
        if self.is_clean() {
            log::info!("{}: {} rows loaded", self.table, self.loaded);
        } else {
            log::warn!(
                "{}: {} rows loaded, {} skipped",
                self.table,
                self.loaded,
                self.skipped.len()
            );
        }
    }
}

/// Table entries plus the diagnostics collected while reading them
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub entries: HashMap<String, T>,
    pub report: LoadReport,
}

// ============================================================================
// LOADERS
// ============================================================================

/// `disease,description`. Extra columns are ignored.
pub fn load_descriptions<R: Read>(reader: R) -> Result<Loaded<String>, DataError> {
    load_table(reader, "descriptions", |record| {
        if record.len() < 2 {
            return Err(SkipReason::TooFewColumns {
                minimum: 2,
                found: record.len(),
            });
        }
        Ok(record[1].to_string())
    })
}

/// `disease,precaution_1,...,precaution_n`. Blank precaution cells are dropped.
pub fn load_precautions<R: Read>(reader: R) -> Result<Loaded<Vec<String>>, DataError> {
    load_table(reader, "precautions", |record| {
        Ok(record
            .iter()
            .skip(1)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect())
    })
}

/// `symptom,severity` with an integer severity; exactly two columns.
pub fn load_severity<R: Read>(reader: R) -> Result<Loaded<i32>, DataError> {
    load_table(reader, "severity", |record| {
        if record.len() != 2 {
            return Err(SkipReason::ColumnCount {
                expected: 2,
                found: record.len(),
            });
        }
        record[1]
            .parse::<i32>()
            .map_err(|_| SkipReason::InvalidSeverity(record[1].to_string()))
    })
}

/// Read a headerless table keyed by its first column. Later duplicates win.
fn load_table<R, T, F>(reader: R, table: &'static str, parse: F) -> Result<Loaded<T>, DataError>
where
    R: Read,
    F: Fn(&StringRecord) -> Result<T, SkipReason>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut entries = HashMap::new();
    let mut report = LoadReport::new(table);

    for record in reader.records() {
        let record = record?;
        let key = record.get(0).unwrap_or_default();
        if key.is_empty() {
            report.skip(&record, SkipReason::EmptyKey);
            continue;
        }
        match parse(&record) {
            Ok(value) => {
                entries.insert(key.to_string(), value);
                report.loaded += 1;
            }
            Err(reason) => report.skip(&record, reason),
        }
    }

    Ok(Loaded { entries, report })
}
