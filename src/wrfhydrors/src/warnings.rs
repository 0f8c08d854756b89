// wrfhydrors/src/warnings.rs

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while comparing two runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffWarning {
    /// A candidate file has no same-named file in the reference directory
    MissingCounterpart {
        candidate: PathBuf,
        reference_dir: PathBuf,
    },

    /// One side of a category had no restart files, so it was skipped
    EmptyCategory {
        category: String,
        candidate_len: usize,
        reference_len: usize,
    },

    /// nccmp reported a difference but its output was not a table
    OutputParseFailure {
        candidate: PathBuf,
        reference: PathBuf,
        reason: String,
    },
}

impl DiffWarning {
    /// Log the warning and hand it back for collection
    pub fn emit(self) -> Self {
        log::warn!("{}", self);
        self
    }
}

impl fmt::Display for DiffWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffWarning::MissingCounterpart {
                candidate,
                reference_dir,
            } => write!(
                f,
                "{} not found in {}, skipping comparison",
                candidate.display(),
                reference_dir.display()
            ),
            DiffWarning::EmptyCategory {
                category,
                candidate_len,
                reference_len,
            } => write!(
                f,
                "{} restart files missing (candidate: {}, reference: {}), skipping category",
                category, candidate_len, reference_len
            ),
            DiffWarning::OutputParseFailure {
                candidate,
                reference,
                reason,
            } => write!(
                f,
                "could not parse nccmp output for {} vs {}: {}",
                candidate.display(),
                reference.display(),
                reason
            ),
        }
    }
}
