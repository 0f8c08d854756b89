// wrfhydrors/src/compare/outcome.rs

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableParseError {
    #[error("output has no header line")]
    MissingHeader,

    #[error("row {row} has {found} fields, header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Whitespace-delimited table printed by `nccmp -S`
///
/// The first non-blank line names the columns; every following non-blank line
/// is a row with exactly as many fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DiffTable {
    pub fn parse(text: &str) -> Result<Self, TableParseError> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());

        let columns: Vec<String> = lines
            .next()
            .ok_or(TableParseError::MissingHeader)?
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (i, line) in lines.enumerate() {
            let row: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if row.len() != columns.len() {
                return Err(TableParseError::RaggedRow {
                    row: i + 1,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn get_f64(&self, row: usize, column: &str) -> Option<f64> {
        self.get(row, column)?.parse().ok()
    }

    /// All cells of one column, top to bottom
    pub fn column_values(&self, column: &str) -> Option<Vec<&str>> {
        let col = self.column_index(column)?;
        Some(self.rows.iter().map(|row| row[col].as_str()).collect())
    }
}

/// What nccmp left behind when its output could not be read as a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub parse_error: String,
}

/// Result of comparing a single pair of files
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Equal,
    Different(DiffTable),
    Failed(RawOutput),
}

impl ComparisonOutcome {
    pub fn is_equal(&self) -> bool {
        matches!(self, ComparisonOutcome::Equal)
    }

    /// A failed comparison cannot prove the files equal, so it counts too.
    pub fn has_difference(&self) -> bool {
        !self.is_equal()
    }

    pub fn table(&self) -> Option<&DiffTable> {
        match self {
            ComparisonOutcome::Different(table) => Some(table),
            _ => None,
        }
    }

    pub fn raw(&self) -> Option<&RawOutput> {
        match self {
            ComparisonOutcome::Failed(raw) => Some(raw),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileComparison {
    pub candidate: PathBuf,
    pub reference: PathBuf,
    pub outcome: ComparisonOutcome,
}

impl FileComparison {
    pub fn has_difference(&self) -> bool {
        self.outcome.has_difference()
    }
}
